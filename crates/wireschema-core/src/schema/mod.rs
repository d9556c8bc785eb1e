// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The schema model: messages, fields, enums, unions, and their catalogs.
//!
//! A schema arrives from a parser (or a deep copy) as an unfixed tree with
//! name-based references, runs through [`Schema::fix`] once, and is then
//! shared read-only between any number of encoders and decoders.

use std::sync::Arc;

use serde::Serialize;
use wireschema_type::Result;

pub mod bits;
pub mod dump;
pub mod field;
pub mod message;
pub mod option;
pub mod r#enum;
pub mod union;
pub mod user;

use field::{EnumRef, UnionRef};
use message::MessageDef;
use option::Options;
use r#enum::EnumDef;
use union::UnionDef;
use user::UserData;

/// A schema pulled in from another source, kept for bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportDef {
	pub url: String,
	pub filename: Option<String>,
}

/// Shared handle to a fixed schema.
///
/// `Arc` provides the atomic reference count: cloning the handle is `ref`,
/// dropping it is `unref`, and the tree (including user data, through each
/// value's own `Drop`) is released when the last handle goes away.
pub type SharedSchema = Arc<Schema>;

/// The root container owning every named entity of one schema.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
	pub options: Options,
	pub messages: Vec<MessageDef>,
	pub enums: Vec<EnumDef>,
	pub unions: Vec<UnionDef>,
	/// Reusable field shapes, fixed after all messages
	pub aliases: Vec<field::FieldDef>,
	pub imports: Vec<ImportDef>,
	#[serde(skip)]
	pub user: UserData,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolve references, compute sizes and offsets, and validate every
	/// layout invariant. Idempotent; stops at the first violation.
	pub fn fix(&mut self) -> Result<()> {
		crate::fix::fix_schema(self)
	}

	/// Re-run the fix pass for one message and everything it references.
	pub fn fix_message(&mut self, name: &str) -> Result<()> {
		crate::fix::fix_one_message(self, name)
	}

	/// First message with this name. Messages without a name are skipped.
	pub fn message(&self, name: &str) -> Option<&MessageDef> {
		self.messages.iter().find(|m| !m.name.is_empty() && m.name == name)
	}

	/// First message with this id. An id of zero is matched as declared,
	/// even though it marks the message as unaddressable by name-based
	/// tooling.
	pub fn message_by_id(&self, msgid: i32) -> Option<&MessageDef> {
		self.messages.iter().find(|m| m.msgid == msgid)
	}

	pub fn message_at(&self, r#ref: &field::MessageRef) -> Option<&MessageDef> {
		match r#ref {
			field::MessageRef::Index(index) => self.messages.get(*index),
			field::MessageRef::Named(_) => None,
		}
	}

	/// Resolve an enum reference, honoring local shadowing when a message
	/// scope is given.
	pub fn enum_at<'a>(&'a self, scope: Option<&'a MessageDef>, r#ref: &EnumRef) -> Option<&'a EnumDef> {
		match r#ref {
			EnumRef::Local(index) => scope.and_then(|m| m.enums.get(*index)),
			EnumRef::Global(index) => self.enums.get(*index),
			EnumRef::Named(_) => None,
		}
	}

	/// Resolve a union reference, honoring local shadowing when a message
	/// scope is given.
	pub fn union_at<'a>(&'a self, scope: Option<&'a MessageDef>, r#ref: &UnionRef) -> Option<&'a UnionDef> {
		match r#ref {
			UnionRef::Local(index) => scope.and_then(|m| m.unions.get(*index)),
			UnionRef::Global(index) => self.unions.get(*index),
			UnionRef::Named(_) => None,
		}
	}

	/// Deep copy with every intra-schema reference preserved (indices are
	/// stable) and every user-data slot cleared.
	pub fn copy(&self) -> Schema {
		self.clone()
	}

	/// Move the schema behind a shared, atomically counted handle.
	pub fn into_shared(self) -> SharedSchema {
		Arc::new(self)
	}

	/// Deterministic textual rendering, usable for equality checks.
	pub fn dump(&self) -> String {
		dump::dump(self)
	}
}
