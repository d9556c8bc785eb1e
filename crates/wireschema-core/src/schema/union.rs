// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;
use wireschema_type::FieldType;

use super::{field::FieldDef, option::Options};

/// A discriminated union: an integer discriminator followed by the widest
/// variant's worth of payload bytes.
///
/// The discriminator's numeric value is the zero-based index into `fields`.
/// `union_size` is populated by the fix pass as the maximum variant size;
/// the wire footprint is `type_ptr.size + union_size`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnionDef {
	pub name: String,
	/// Discriminator field, laid out before the variant payload
	pub type_ptr: FieldDef,
	/// Variants in declaration order
	pub fields: Vec<FieldDef>,
	pub union_size: usize,
	pub options: Options,
}

impl UnionDef {
	pub fn new(
		name: impl Into<String>,
		discriminator: FieldType,
		fields: impl IntoIterator<Item = FieldDef>,
	) -> Self {
		Self {
			name: name.into(),
			type_ptr: FieldDef::scalar("type", discriminator),
			fields: fields.into_iter().collect(),
			union_size: 0,
			options: Options::new(),
		}
	}

	/// Number of variants.
	pub fn fields_size(&self) -> usize {
		self.fields.len()
	}

	/// Wire footprint of the whole union block.
	pub fn wire_size(&self) -> usize {
		self.type_ptr.size + self.union_size
	}

	/// Variant selected by a discriminator value.
	pub fn variant(&self, discriminator: i64) -> Option<&FieldDef> {
		usize::try_from(discriminator).ok().and_then(|i| self.fields.get(i))
	}

	pub fn variant_by_name(&self, name: &str) -> Option<(usize, &FieldDef)> {
		self.fields.iter().enumerate().find(|(_, f)| f.name == name)
	}
}
