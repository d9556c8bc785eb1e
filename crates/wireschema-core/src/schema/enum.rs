// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;
use wireschema_type::FieldType;

use super::option::Options;

/// A named enumeration value. Neither names nor numeric values have to be
/// unique within one enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumValueDef {
	pub name: String,
	pub value: i64,
}

impl EnumValueDef {
	pub fn new(name: impl Into<String>, value: i64) -> Self {
		Self {
			name: name.into(),
			value,
		}
	}
}

/// An enumeration over an integer storage type.
///
/// `size` is populated by the fix pass from the underlying type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumDef {
	pub name: String,
	pub r#type: FieldType,
	pub size: usize,
	pub values: Vec<EnumValueDef>,
	pub options: Options,
}

impl EnumDef {
	pub fn new(name: impl Into<String>, r#type: FieldType) -> Self {
		Self {
			name: name.into(),
			r#type,
			size: 0,
			values: Vec::new(),
			options: Options::new(),
		}
	}

	pub fn with_values(
		name: impl Into<String>,
		r#type: FieldType,
		values: impl IntoIterator<Item = (&'static str, i64)>,
	) -> Self {
		let mut def = Self::new(name, r#type);
		def.values = values.into_iter().map(|(n, v)| EnumValueDef::new(n, v)).collect();
		def
	}

	/// First value with this name, in declaration order.
	pub fn value(&self, name: &str) -> Option<i64> {
		self.values.iter().find(|v| v.name == name).map(|v| v.value)
	}

	/// First name carrying this numeric value, in declaration order.
	pub fn name_of(&self, value: i64) -> Option<&str> {
		self.values.iter().find(|v| v.value == value).map(|v| v.name.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_value_lookup() {
		let def = EnumDef::with_values("side", FieldType::UInt8, [("buy", 0), ("sell", 1)]);
		assert_eq!(def.value("sell"), Some(1));
		assert_eq!(def.value("hold"), None);
		assert_eq!(def.name_of(0), Some("buy"));
		assert_eq!(def.name_of(9), None);
	}

	#[test]
	fn test_duplicates_resolve_in_declaration_order() {
		let def = EnumDef::with_values(
			"state",
			FieldType::Int32,
			[("open", 1), ("active", 1), ("open", 2)],
		);
		assert_eq!(def.value("open"), Some(1));
		assert_eq!(def.name_of(1), Some("open"));
	}
}
