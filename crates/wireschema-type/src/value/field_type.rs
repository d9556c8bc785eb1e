// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// All wire-level field types.
///
/// Scalars are stored little-endian and packed; compound types (`Message`,
/// `Array`, `Pointer`, `Union`) carry their layout in the owning field
/// descriptor and have no intrinsic width.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldType {
	/// A 1-byte signed integer
	Int8,
	/// A 2-byte signed integer
	Int16,
	/// A 4-byte signed integer
	Int32,
	/// An 8-byte signed integer
	Int64,
	/// A 1-byte unsigned integer
	UInt8,
	/// A 2-byte unsigned integer
	UInt16,
	/// A 4-byte unsigned integer
	UInt32,
	/// An 8-byte unsigned integer
	UInt64,
	/// An 8-byte IEEE 754 floating point
	Double,
	/// A 16-byte decimal floating point
	Decimal128,
	/// A fixed-size run of bytes; the width comes from the declaration
	Bytes,
	/// An embedded message laid out by value
	Message,
	/// An inline array: count word followed by a fixed capacity of elements
	Array,
	/// An offset pointer into the trailing region
	Pointer,
	/// A discriminated union
	Union,
}

impl FieldType {
	/// Storage width of a scalar, `None` for types whose width comes from
	/// the field descriptor.
	pub const fn fixed_size(&self) -> Option<usize> {
		match self {
			FieldType::Int8 | FieldType::UInt8 => Some(1),
			FieldType::Int16 | FieldType::UInt16 => Some(2),
			FieldType::Int32 | FieldType::UInt32 => Some(4),
			FieldType::Int64 | FieldType::UInt64 => Some(8),
			FieldType::Double => Some(8),
			FieldType::Decimal128 => Some(16),
			FieldType::Bytes
			| FieldType::Message
			| FieldType::Array
			| FieldType::Pointer
			| FieldType::Union => None,
		}
	}

	pub const fn is_signed_integer(&self) -> bool {
		matches!(self, FieldType::Int8 | FieldType::Int16 | FieldType::Int32 | FieldType::Int64)
	}

	pub const fn is_unsigned_integer(&self) -> bool {
		matches!(self, FieldType::UInt8 | FieldType::UInt16 | FieldType::UInt32 | FieldType::UInt64)
	}

	pub const fn is_integer(&self) -> bool {
		self.is_signed_integer() || self.is_unsigned_integer()
	}

	/// Largest non-negative value storable in this width, used to validate
	/// inline array capacities against their count field.
	pub const fn max_unsigned(&self) -> Option<u64> {
		match self {
			FieldType::Int8 => Some(i8::MAX as u64),
			FieldType::Int16 => Some(i16::MAX as u64),
			FieldType::Int32 => Some(i32::MAX as u64),
			FieldType::Int64 => Some(i64::MAX as u64),
			FieldType::UInt8 => Some(u8::MAX as u64),
			FieldType::UInt16 => Some(u16::MAX as u64),
			FieldType::UInt32 => Some(u32::MAX as u64),
			FieldType::UInt64 => Some(u64::MAX),
			_ => None,
		}
	}

	/// Decimal digits that always fit in this width; the ceiling for a
	/// fixed-point precision.
	pub const fn decimal_digits(&self) -> Option<u32> {
		match self {
			FieldType::Int8 | FieldType::UInt8 => Some(2),
			FieldType::Int16 | FieldType::UInt16 => Some(4),
			FieldType::Int32 | FieldType::UInt32 => Some(9),
			FieldType::Int64 => Some(18),
			FieldType::UInt64 => Some(19),
			_ => None,
		}
	}

	/// Signed range check for enum values declared over this width.
	pub const fn holds(&self, value: i64) -> bool {
		match self {
			FieldType::Int8 => value >= i8::MIN as i64 && value <= i8::MAX as i64,
			FieldType::Int16 => value >= i16::MIN as i64 && value <= i16::MAX as i64,
			FieldType::Int32 => value >= i32::MIN as i64 && value <= i32::MAX as i64,
			FieldType::Int64 => true,
			FieldType::UInt8 => value >= 0 && value <= u8::MAX as i64,
			FieldType::UInt16 => value >= 0 && value <= u16::MAX as i64,
			FieldType::UInt32 => value >= 0 && value <= u32::MAX as i64,
			FieldType::UInt64 => value >= 0,
			_ => false,
		}
	}
}

impl Display for FieldType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			FieldType::Int8 => "int8",
			FieldType::Int16 => "int16",
			FieldType::Int32 => "int32",
			FieldType::Int64 => "int64",
			FieldType::UInt8 => "uint8",
			FieldType::UInt16 => "uint16",
			FieldType::UInt32 => "uint32",
			FieldType::UInt64 => "uint64",
			FieldType::Double => "double",
			FieldType::Decimal128 => "decimal128",
			FieldType::Bytes => "bytes",
			FieldType::Message => "message",
			FieldType::Array => "array",
			FieldType::Pointer => "pointer",
			FieldType::Union => "union",
		})
	}
}

impl FromStr for FieldType {
	type Err = ();

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"int8" => Ok(FieldType::Int8),
			"int16" => Ok(FieldType::Int16),
			"int32" => Ok(FieldType::Int32),
			"int64" => Ok(FieldType::Int64),
			"uint8" => Ok(FieldType::UInt8),
			"uint16" => Ok(FieldType::UInt16),
			"uint32" => Ok(FieldType::UInt32),
			"uint64" => Ok(FieldType::UInt64),
			"double" => Ok(FieldType::Double),
			"decimal128" => Ok(FieldType::Decimal128),
			"bytes" => Ok(FieldType::Bytes),
			"message" => Ok(FieldType::Message),
			"array" => Ok(FieldType::Array),
			"pointer" => Ok(FieldType::Pointer),
			"union" => Ok(FieldType::Union),
			_ => Err(()),
		}
	}
}
