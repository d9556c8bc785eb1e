// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::mem::size_of;

use wireschema_type::{Result, SchemaError};

use super::buf::EncodedMessage;

macro_rules! read_le {
	($name:ident, $ty:ty) => {
		pub fn $name(&self, at: usize) -> Result<$ty> {
			let bytes = self.range(at, size_of::<$ty>())?;
			Ok(<$ty>::from_le_bytes(bytes.try_into().unwrap()))
		}
	};
}

macro_rules! write_le {
	($name:ident, $ty:ty) => {
		pub fn $name(&mut self, at: usize, value: $ty) -> Result<()> {
			let bytes = self.range_mut(at, size_of::<$ty>())?;
			bytes.copy_from_slice(&value.to_le_bytes());
			Ok(())
		}
	};
}

/// Read-only window into a byte buffer.
///
/// All accessors take offsets relative to the window start; `view(delta)`
/// narrows without copying. The window never owns its buffer.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
	data: &'a [u8],
	start: usize,
}

impl<'a> View<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			start: 0,
		}
	}

	/// Remaining bytes from the window start to the end of the buffer.
	pub fn size(&self) -> usize {
		self.data.len().saturating_sub(self.start)
	}

	/// Sub-window starting `delta` bytes further in.
	pub fn view(&self, delta: usize) -> View<'a> {
		View {
			data: self.data,
			start: self.start + delta,
		}
	}

	pub fn bytes_at(&self, at: usize, len: usize) -> Result<&'a [u8]> {
		self.range(at, len)
	}

	fn range(&self, at: usize, len: usize) -> Result<&'a [u8]> {
		let begin = self.start + at;
		let end = begin + len;
		if end > self.data.len() {
			return Err(SchemaError::OutOfBounds {
				index: end,
				length: self.data.len(),
			});
		}
		Ok(&self.data[begin..end])
	}

	read_le!(u8_at, u8);
	read_le!(u16_at, u16);
	read_le!(u32_at, u32);
	read_le!(u64_at, u64);
	read_le!(i8_at, i8);
	read_le!(i16_at, i16);
	read_le!(i32_at, i32);
	read_le!(i64_at, i64);
}

/// Mutable window over an [`EncodedMessage`].
///
/// On top of the read-only surface it writes little-endian scalars and can
/// grow the underlying buffer, which is what pointer allocation uses to
/// extend the trailing region.
#[derive(Debug)]
pub struct ViewMut<'a> {
	buf: &'a mut EncodedMessage,
	start: usize,
}

impl<'a> ViewMut<'a> {
	pub fn new(buf: &'a mut EncodedMessage, start: usize) -> Self {
		Self {
			buf,
			start,
		}
	}

	pub fn size(&self) -> usize {
		self.buf.len().saturating_sub(self.start)
	}

	/// Sub-window starting `delta` bytes further in, borrowing the same
	/// buffer.
	pub fn view(&mut self, delta: usize) -> ViewMut<'_> {
		ViewMut {
			start: self.start + delta,
			buf: &mut *self.buf,
		}
	}

	pub fn as_view(&self) -> View<'_> {
		View::new(self.buf).view(self.start)
	}

	/// Grow the underlying buffer so this window holds at least `n`
	/// bytes. Never shrinks.
	pub fn resize(&mut self, n: usize) {
		self.buf.grow_to(self.start + n);
	}

	fn range_mut(&mut self, at: usize, len: usize) -> Result<&mut [u8]> {
		let begin = self.start + at;
		let end = begin + len;
		if end > self.buf.len() {
			return Err(SchemaError::OutOfBounds {
				index: end,
				length: self.buf.len(),
			});
		}
		Ok(&mut self.buf.as_mut_slice()[begin..end])
	}

	write_le!(write_u8_at, u8);
	write_le!(write_u16_at, u16);
	write_le!(write_u32_at, u32);
	write_le!(write_u64_at, u64);
	write_le!(write_i8_at, i8);
	write_le!(write_i16_at, i16);
	write_le!(write_i32_at, i32);
	write_le!(write_i64_at, i64);
}
