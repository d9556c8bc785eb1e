// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;

use super::{field::FieldDef, option::Options, r#enum::EnumDef, union::UnionDef, user::UserData};

/// A named, fixed-size message body.
///
/// `size` is populated by the fix pass; variable data is reached through
/// pointer fields into the trailing region. `msgid == 0` means the message
/// is not addressable by id.
#[derive(Clone, Debug, Serialize)]
pub struct MessageDef {
	pub name: String,
	pub msgid: i32,
	pub size: usize,
	pub fields: Vec<FieldDef>,
	/// Enums local to this message; they shadow globals of the same name
	pub enums: Vec<EnumDef>,
	/// Unions local to this message; they shadow globals of the same name
	pub unions: Vec<UnionDef>,
	pub options: Options,
	#[serde(skip)]
	pub user: UserData,
}

impl Default for MessageDef {
	fn default() -> Self {
		Self::new("", 0)
	}
}

impl MessageDef {
	pub fn new(name: impl Into<String>, msgid: i32) -> Self {
		Self {
			name: name.into(),
			msgid,
			size: 0,
			fields: Vec::new(),
			enums: Vec::new(),
			unions: Vec::new(),
			options: Options::new(),
			user: UserData::new(),
		}
	}

	pub fn with_fields(name: impl Into<String>, msgid: i32, fields: impl IntoIterator<Item = FieldDef>) -> Self {
		let mut def = Self::new(name, msgid);
		def.fields = fields.into_iter().collect();
		def
	}

	pub fn field(&self, name: &str) -> Option<&FieldDef> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn local_enum(&self, name: &str) -> Option<(usize, &EnumDef)> {
		self.enums.iter().enumerate().find(|(_, e)| e.name == name)
	}

	pub fn local_union(&self, name: &str) -> Option<(usize, &UnionDef)> {
		self.unions.iter().enumerate().find(|(_, u)| u.name == name)
	}
}
