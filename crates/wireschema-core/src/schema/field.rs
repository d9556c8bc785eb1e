// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;
use wireschema_type::{FieldType, PointerVersion, SubType, TimeResolution};

use super::{bits::BitFieldDef, option::Options, user::UserData};

/// Reference to a message in the schema catalog.
///
/// Parsers produce `Named`; the fix pass rewrites to a stable index into
/// `Schema::messages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MessageRef {
	Named(String),
	Index(usize),
}

/// Reference to an enum, local catalog first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum EnumRef {
	Named(String),
	/// Index into the enclosing message's local enums
	Local(usize),
	/// Index into the schema's global enums
	Global(usize),
}

/// Reference to a union, local catalog first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum UnionRef {
	Named(String),
	Local(usize),
	Global(usize),
}

/// Type-specific payload of a field, keyed by its base type or sub-type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FieldDescriptor {
	None,
	/// Embedded message laid out by value
	Message(MessageRef),
	/// Inline array: `count` word, then `capacity` slots of `element`
	Array {
		element: Box<FieldDef>,
		count: Box<FieldDef>,
		capacity: usize,
	},
	/// Offset pointer; `element` describes one entry of the payload
	Pointer {
		element: Box<FieldDef>,
		version: PointerVersion,
	},
	Union(UnionRef),
	Enum(EnumRef),
	FixedPoint {
		precision: u32,
	},
	Time {
		resolution: TimeResolution,
	},
	Bits(Vec<BitFieldDef>),
}

/// A named slot at an offset inside a message.
///
/// `offset` and `size` are populated by the fix pass; before that only the
/// declaration (`r#type`, `sub_type`, `desc`) is meaningful. `Bytes` fields
/// carry their declared width in `size` from the start.
#[derive(Clone, Debug, Serialize)]
pub struct FieldDef {
	pub name: String,
	pub offset: usize,
	pub size: usize,
	pub r#type: FieldType,
	pub sub_type: SubType,
	pub desc: FieldDescriptor,
	pub options: Options,
	#[serde(skip)]
	pub user: UserData,
}

impl PartialEq for FieldDef {
	fn eq(&self, other: &Self) -> bool {
		// User data never participates in semantic equality.
		self.name == other.name
			&& self.offset == other.offset
			&& self.size == other.size
			&& self.r#type == other.r#type
			&& self.sub_type == other.sub_type
			&& self.desc == other.desc
			&& self.options == other.options
	}
}

impl FieldDef {
	fn with_parts(name: impl Into<String>, r#type: FieldType, sub_type: SubType, desc: FieldDescriptor) -> Self {
		Self {
			name: name.into(),
			offset: 0,
			size: 0,
			r#type,
			sub_type,
			desc,
			options: Options::new(),
			user: UserData::new(),
		}
	}

	/// A plain scalar field (integers, `Double`, `Decimal128`).
	pub fn scalar(name: impl Into<String>, r#type: FieldType) -> Self {
		Self::with_parts(name, r#type, SubType::None, FieldDescriptor::None)
	}

	/// A fixed-width run of `size` bytes.
	pub fn bytes(name: impl Into<String>, size: usize) -> Self {
		let mut field = Self::with_parts(name, FieldType::Bytes, SubType::None, FieldDescriptor::None);
		field.size = size;
		field
	}

	/// Bytes holding NUL-terminated text.
	pub fn byte_string(name: impl Into<String>, size: usize) -> Self {
		let mut field = Self::bytes(name, size);
		field.sub_type = SubType::ByteString;
		field
	}

	/// Bytes carved into named bit ranges.
	pub fn bits(name: impl Into<String>, size: usize, bits: Vec<BitFieldDef>) -> Self {
		let mut field = Self::bytes(name, size);
		field.sub_type = SubType::Bits;
		field.desc = FieldDescriptor::Bits(bits);
		field
	}

	/// An embedded message, referenced by name until fixed.
	pub fn message(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::with_parts(
			name,
			FieldType::Message,
			SubType::None,
			FieldDescriptor::Message(MessageRef::Named(message.into())),
		)
	}

	/// An inline array of `capacity` elements preceded by a count word.
	pub fn array(name: impl Into<String>, element: FieldDef, count_type: FieldType, capacity: usize) -> Self {
		let count = FieldDef::scalar(format!("{}_count", element.name), count_type);
		Self::with_parts(
			name,
			FieldType::Array,
			SubType::None,
			FieldDescriptor::Array {
				element: Box::new(element),
				count: Box::new(count),
				capacity,
			},
		)
	}

	/// An offset pointer to a variable-length run of `element`.
	pub fn pointer(name: impl Into<String>, element: FieldDef, version: PointerVersion) -> Self {
		Self::with_parts(
			name,
			FieldType::Pointer,
			SubType::None,
			FieldDescriptor::Pointer {
				element: Box::new(element),
				version,
			},
		)
	}

	/// A discriminated union, referenced by name until fixed.
	pub fn union_type(name: impl Into<String>, union: impl Into<String>) -> Self {
		Self::with_parts(
			name,
			FieldType::Union,
			SubType::None,
			FieldDescriptor::Union(UnionRef::Named(union.into())),
		)
	}

	/// An enum-typed field; storage type and size come from the enum at
	/// fix time.
	pub fn enum_type(name: impl Into<String>, r#enum: impl Into<String>) -> Self {
		Self::with_parts(
			name,
			FieldType::Int8,
			SubType::Enum,
			FieldDescriptor::Enum(EnumRef::Named(r#enum.into())),
		)
	}

	/// An integer scaled by `10^-precision`.
	pub fn fixed_point(name: impl Into<String>, r#type: FieldType, precision: u32) -> Self {
		Self::with_parts(
			name,
			r#type,
			SubType::FixedPoint,
			FieldDescriptor::FixedPoint {
				precision,
			},
		)
	}

	/// An integer counting `resolution` units since the epoch.
	pub fn time_point(name: impl Into<String>, r#type: FieldType, resolution: TimeResolution) -> Self {
		Self::with_parts(
			name,
			r#type,
			SubType::TimePoint,
			FieldDescriptor::Time {
				resolution,
			},
		)
	}

	/// An integer counting `resolution` units.
	pub fn duration(name: impl Into<String>, r#type: FieldType, resolution: TimeResolution) -> Self {
		Self::with_parts(
			name,
			r#type,
			SubType::Duration,
			FieldDescriptor::Time {
				resolution,
			},
		)
	}

	pub fn with_options(mut self, options: Options) -> Self {
		self.options = options;
		self
	}

	/// Bytes this field occupies in the containing layout. Only meaningful
	/// once the field is fixed.
	pub fn element_size(&self) -> usize {
		self.size
	}

	/// True only for offset pointers; arrays and unions are fixed-width in
	/// the body.
	pub fn is_variable(&self) -> bool {
		matches!(self.r#type, FieldType::Pointer)
	}

	pub fn pointer_version(&self) -> Option<PointerVersion> {
		match &self.desc {
			FieldDescriptor::Pointer {
				version,
				..
			} => Some(*version),
			_ => None,
		}
	}

	pub fn pointer_element(&self) -> Option<&FieldDef> {
		match &self.desc {
			FieldDescriptor::Pointer {
				element,
				..
			} => Some(element),
			_ => None,
		}
	}

	pub fn array_element(&self) -> Option<&FieldDef> {
		match &self.desc {
			FieldDescriptor::Array {
				element,
				..
			} => Some(element),
			_ => None,
		}
	}

	pub fn array_count(&self) -> Option<&FieldDef> {
		match &self.desc {
			FieldDescriptor::Array {
				count,
				..
			} => Some(count),
			_ => None,
		}
	}

	pub fn array_capacity(&self) -> Option<usize> {
		match &self.desc {
			FieldDescriptor::Array {
				capacity,
				..
			} => Some(*capacity),
			_ => None,
		}
	}

	pub fn bit_fields(&self) -> Option<&[BitFieldDef]> {
		match &self.desc {
			FieldDescriptor::Bits(bits) => Some(bits),
			_ => None,
		}
	}

	pub fn fixed_precision(&self) -> Option<u32> {
		match &self.desc {
			FieldDescriptor::FixedPoint {
				precision,
			} => Some(*precision),
			_ => None,
		}
	}

	pub fn time_resolution(&self) -> Option<TimeResolution> {
		match &self.desc {
			FieldDescriptor::Time {
				resolution,
			} => Some(*resolution),
			_ => None,
		}
	}
}
