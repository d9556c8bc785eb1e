// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::Any,
	fmt::{Debug, Formatter},
	sync::OnceLock,
};

/// Opaque set-once slot for host data attached to a schema, message, or
/// field.
///
/// Hosts hang compiled codecs or generated artifacts here. The boxed value
/// is dropped with the owning entity; cloning the entity (deep copy) leaves
/// the slot empty in the copy.
pub struct UserData(OnceLock<Box<dyn Any + Send + Sync>>);

impl UserData {
	pub const fn new() -> Self {
		Self(OnceLock::new())
	}

	/// Attach a value; fails if the slot is already occupied.
	pub fn set<T: Any + Send + Sync>(&self, value: T) -> Result<(), T> {
		let mut boxed = Some(Box::new(value));
		// OnceLock::set would lose the typed value, so go through
		// get_or_init and report back whether ours won.
		self.0.get_or_init(|| boxed.take().unwrap());
		match boxed {
			None => Ok(()),
			Some(value) => Err(*value),
		}
	}

	pub fn get<T: Any>(&self) -> Option<&T> {
		self.0.get().and_then(|b| b.downcast_ref::<T>())
	}

	pub fn is_set(&self) -> bool {
		self.0.get().is_some()
	}
}

impl Default for UserData {
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for UserData {
	fn clone(&self) -> Self {
		// Deep copies never carry user data.
		Self::new()
	}
}

impl Debug for UserData {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.is_set() {
			f.write_str("UserData(set)")
		} else {
			f.write_str("UserData(empty)")
		}
	}
}
