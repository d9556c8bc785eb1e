// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::Deref;

use crate::schema::message::MessageDef;

use super::view::{View, ViewMut};

// [body]:[trailing region]
/// A growable buffer owning one encoded message: the fixed-size body
/// followed by the trailing region that offset pointers index into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedMessage(Vec<u8>);

impl Deref for EncodedMessage {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl EncodedMessage {
	/// Zero-filled buffer of `body_size` bytes; pointer allocations grow
	/// it past the body.
	pub fn new(body_size: usize) -> Self {
		Self(vec![0; body_size])
	}

	/// Buffer sized for a fixed message's body.
	pub fn for_message(message: &MessageDef) -> Self {
		Self::new(message.size)
	}

	pub fn from_vec(data: Vec<u8>) -> Self {
		Self(data)
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.0
	}

	/// Read-only window starting `at` bytes into the buffer.
	pub fn view(&self, at: usize) -> View<'_> {
		View::new(&self.0).view(at)
	}

	/// Mutable window starting `at` bytes into the buffer.
	pub fn view_mut(&mut self, at: usize) -> ViewMut<'_> {
		ViewMut::new(self, at)
	}

	/// Length only ever grows; new bytes are zeroed.
	pub(crate) fn grow_to(&mut self, len: usize) {
		if len > self.0.len() {
			self.0.resize(len, 0);
		}
	}
}
