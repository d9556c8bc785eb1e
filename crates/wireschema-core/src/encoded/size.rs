// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use wireschema_type::{FieldType, Result};

use crate::schema::field::FieldDef;

use super::view::{View, ViewMut};

/// Read an integer count through a typed field.
///
/// Non-integer fields yield the `-1` sentinel; only a truncated buffer is
/// an error. Unsigned 64-bit values wrap into the signed return.
pub fn read_size(field: &FieldDef, view: &View<'_>) -> Result<i64> {
	Ok(match field.r#type {
		FieldType::Int8 => view.i8_at(0)? as i64,
		FieldType::Int16 => view.i16_at(0)? as i64,
		FieldType::Int32 => view.i32_at(0)? as i64,
		FieldType::Int64 => view.i64_at(0)?,
		FieldType::UInt8 => view.u8_at(0)? as i64,
		FieldType::UInt16 => view.u16_at(0)? as i64,
		FieldType::UInt32 => view.u32_at(0)? as i64,
		FieldType::UInt64 => view.u64_at(0)? as i64,
		_ => -1,
	})
}

/// Write an integer count through a typed field.
///
/// Values wider than the field are truncated by two's-complement store;
/// non-integer fields are left untouched.
pub fn write_size(field: &FieldDef, view: &mut ViewMut<'_>, value: u64) -> Result<()> {
	match field.r#type {
		FieldType::Int8 => view.write_i8_at(0, value as i8)?,
		FieldType::Int16 => view.write_i16_at(0, value as i16)?,
		FieldType::Int32 => view.write_i32_at(0, value as i32)?,
		FieldType::Int64 => view.write_i64_at(0, value as i64)?,
		FieldType::UInt8 => view.write_u8_at(0, value as u8)?,
		FieldType::UInt16 => view.write_u16_at(0, value as u16)?,
		FieldType::UInt32 => view.write_u32_at(0, value as u32)?,
		FieldType::UInt64 => view.write_u64_at(0, value)?,
		_ => {},
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encoded::buf::EncodedMessage;

	fn round_trip(r#type: FieldType, value: u64) -> i64 {
		let field = FieldDef::scalar("n", r#type);
		let mut buf = EncodedMessage::new(8);
		write_size(&field, &mut buf.view_mut(0), value).unwrap();
		read_size(&field, &buf.view(0)).unwrap()
	}

	#[test]
	fn test_round_trip_all_widths() {
		assert_eq!(round_trip(FieldType::Int8, 5), 5);
		assert_eq!(round_trip(FieldType::Int16, 300), 300);
		assert_eq!(round_trip(FieldType::Int32, 70_000), 70_000);
		assert_eq!(round_trip(FieldType::Int64, 1 << 40), 1 << 40);
		assert_eq!(round_trip(FieldType::UInt8, 200), 200);
		assert_eq!(round_trip(FieldType::UInt16, 42_000), 42_000);
		assert_eq!(round_trip(FieldType::UInt32, 3_000_000_000), 3_000_000_000);
		assert_eq!(round_trip(FieldType::UInt64, 7), 7);
	}

	#[test]
	fn test_write_truncates_to_width() {
		// value mod 2^width survives the store
		assert_eq!(round_trip(FieldType::UInt8, 0x1FF), 0xFF);
		assert_eq!(round_trip(FieldType::UInt16, 0x1_0005), 5);
		assert_eq!(round_trip(FieldType::Int8, 0x80), -128);
	}

	#[test]
	fn test_non_integer_is_sentinel_and_no_op() {
		let field = FieldDef::scalar("d", FieldType::Double);
		let mut buf = EncodedMessage::new(8);
		write_size(&field, &mut buf.view_mut(0), 9).unwrap();
		assert!(buf.iter().all(|b| *b == 0));
		assert_eq!(read_size(&field, &buf.view(0)).unwrap(), -1);
	}

	#[test]
	fn test_truncated_buffer_is_an_error() {
		let field = FieldDef::scalar("n", FieldType::UInt32);
		let buf = EncodedMessage::new(2);
		assert!(read_size(&field, &buf.view(0)).is_err());
	}
}
