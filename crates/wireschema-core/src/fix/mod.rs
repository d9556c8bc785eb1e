// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The layout pass: resolve name references to stable indices, compute
//! entity sizes bottom-up, assign field offsets, and validate every
//! invariant the wire layout depends on.
//!
//! The pass is idempotent. Messages are fixed in declaration order with
//! on-demand recursion for forward references; a three-state marker per
//! message (and per global union) turns by-value containment cycles into
//! errors instead of unbounded recursion.
//!
//! Self-reference through a pointer field is always legal: the pointer
//! contributes only its header to the enclosing body. When a pointer
//! element refers to a message that is still mid-fix, its element size is
//! deferred and patched once every message size is final.

use std::collections::HashSet;
use std::mem;

use tracing::{instrument, trace};
use wireschema_type::{FieldType, Result, SchemaError, SubType};

use crate::schema::{
	field::{EnumRef, FieldDef, FieldDescriptor, MessageRef, UnionRef},
	message::MessageDef,
	r#enum::EnumDef,
	union::UnionDef,
	Schema,
};

#[derive(Clone, Copy, PartialEq)]
enum State {
	Unfixed,
	Fixing,
	Fixed,
}

/// Local catalogs visible while fixing one field. Globals are reached
/// through the schema itself.
struct Scope<'s> {
	enums: &'s [EnumDef],
	unions: &'s [UnionDef],
}

const GLOBAL: Scope<'static> = Scope {
	enums: &[],
	unions: &[],
};

#[instrument(name = "schema::fix", level = "trace", skip(schema))]
pub(crate) fn fix_schema(schema: &mut Schema) -> Result<()> {
	let mut fixer = Fixer::new(schema);
	fixer.check_duplicates()?;
	fixer.fix_global_enums()?;
	for index in 0..fixer.schema.messages.len() {
		fixer.fix_message(index)?;
	}
	for index in 0..fixer.schema.unions.len() {
		fixer.fix_union(index)?;
	}
	fixer.fix_aliases()?;
	fixer.patch_deferred();
	Ok(())
}

pub(crate) fn fix_one_message(schema: &mut Schema, name: &str) -> Result<()> {
	let mut fixer = Fixer::new(schema);
	fixer.fix_global_enums()?;
	let index = fixer
		.message_names
		.iter()
		.position(|n| !n.is_empty() && n == name)
		.ok_or_else(|| SchemaError::Unresolved {
			entity: String::from("schema"),
			name: name.to_owned(),
		})?;
	fixer.fix_message(index)?;
	fixer.patch_deferred();
	Ok(())
}

struct Fixer<'a> {
	schema: &'a mut Schema,
	/// Name snapshots so resolution and error reporting keep working
	/// while an entity is temporarily detached from the catalog
	message_names: Vec<String>,
	union_names: Vec<String>,
	message_state: Vec<State>,
	union_state: Vec<State>,
	/// A pointer element referenced a mid-fix message; sizes inside
	/// pointer payload descriptors need a final patch walk
	deferred: bool,
}

impl<'a> Fixer<'a> {
	fn new(schema: &'a mut Schema) -> Self {
		let message_names = schema.messages.iter().map(|m| m.name.clone()).collect();
		let union_names = schema.unions.iter().map(|u| u.name.clone()).collect();
		let message_state = vec![State::Unfixed; schema.messages.len()];
		let union_state = vec![State::Unfixed; schema.unions.len()];
		Self {
			schema,
			message_names,
			union_names,
			message_state,
			union_state,
			deferred: false,
		}
	}

	fn check_duplicates(&self) -> Result<()> {
		check_unique("schema messages", self.message_names.iter().map(String::as_str))?;
		check_unique("schema enums", self.schema.enums.iter().map(|e| e.name.as_str()))?;
		check_unique("schema unions", self.schema.unions.iter().map(|u| u.name.as_str()))?;
		check_unique("schema aliases", self.schema.aliases.iter().map(|a| a.name.as_str()))
	}

	fn fix_global_enums(&mut self) -> Result<()> {
		for def in &mut self.schema.enums {
			fix_enum(def)?;
		}
		Ok(())
	}

	fn fix_message(&mut self, index: usize) -> Result<()> {
		match self.message_state[index] {
			State::Fixed => return Ok(()),
			State::Fixing => {
				return Err(SchemaError::Cycle {
					message: self.message_names[index].clone(),
				})
			},
			State::Unfixed => {},
		}
		self.message_state[index] = State::Fixing;

		// Detach the message so its local catalogs can be borrowed
		// while the rest of the schema stays reachable for recursion.
		let mut message = mem::take(&mut self.schema.messages[index]);
		let result = self.fix_message_body(&mut message);
		self.schema.messages[index] = message;

		if result.is_ok() {
			self.message_state[index] = State::Fixed;
			trace!(
				name = self.message_names[index].as_str(),
				size = self.schema.messages[index].size,
				"message fixed"
			);
		}
		result
	}

	fn fix_message_body(&mut self, message: &mut MessageDef) -> Result<()> {
		let scope_name = format!("message `{}`", message.name);
		check_unique(&scope_name, message.fields.iter().map(|f| f.name.as_str()))?;
		check_unique(&scope_name, message.enums.iter().map(|e| e.name.as_str()))?;
		check_unique(&scope_name, message.unions.iter().map(|u| u.name.as_str()))?;

		for def in &mut message.enums {
			fix_enum(def)?;
		}

		let mut unions = mem::take(&mut message.unions);
		let mut result = Ok(());
		for def in &mut unions {
			result = self.fix_union_body(
				def,
				&Scope {
					enums: &message.enums,
					unions: &[],
				},
			);
			if result.is_err() {
				break;
			}
		}
		message.unions = unions;
		result?;

		let scope_enums = mem::take(&mut message.enums);
		let scope_unions = mem::take(&mut message.unions);
		let mut fields = mem::take(&mut message.fields);
		let scope = Scope {
			enums: &scope_enums,
			unions: &scope_unions,
		};
		let mut offset = 0usize;
		let mut result = Ok(());
		for field in &mut fields {
			result = self.fix_field(field, &scope, false);
			if result.is_err() {
				break;
			}
			field.offset = offset;
			offset += field.size;
		}
		message.enums = scope_enums;
		message.unions = scope_unions;
		message.fields = fields;
		result?;
		message.size = offset;
		Ok(())
	}

	fn fix_union(&mut self, index: usize) -> Result<()> {
		match self.union_state[index] {
			State::Fixed => return Ok(()),
			State::Fixing => {
				return Err(SchemaError::Cycle {
					message: self.union_names[index].clone(),
				})
			},
			State::Unfixed => {},
		}
		self.union_state[index] = State::Fixing;

		let placeholder = UnionDef::new(String::new(), FieldType::UInt8, []);
		let mut def = mem::replace(&mut self.schema.unions[index], placeholder);
		let result = self.fix_union_body(&mut def, &GLOBAL);
		self.schema.unions[index] = def;

		if result.is_ok() {
			self.union_state[index] = State::Fixed;
		}
		result
	}

	fn fix_union_body(&mut self, def: &mut UnionDef, scope: &Scope<'_>) -> Result<()> {
		check_unique(&format!("union `{}`", def.name), def.fields.iter().map(|f| f.name.as_str()))?;

		if !def.type_ptr.r#type.is_integer() {
			return Err(SchemaError::BadSubType {
				field: format!("{}.{}", def.name, def.type_ptr.name),
				reason: String::from("union discriminator must be an integer"),
			});
		}
		def.type_ptr.size = def.type_ptr.r#type.fixed_size().expect("integer width");
		def.type_ptr.offset = 0;

		let mut union_size = 0usize;
		for variant in &mut def.fields {
			if variant.r#type == FieldType::Union {
				return Err(SchemaError::BadSubType {
					field: format!("{}.{}", def.name, variant.name),
					reason: String::from("union variant cannot be a union"),
				});
			}
			// Variants are contained by value, so they never inherit
			// a pointer context.
			self.fix_field(variant, scope, false)?;
			// Every variant shares the first byte after the
			// discriminator.
			variant.offset = def.type_ptr.size;
			union_size = union_size.max(variant.size);
		}
		def.union_size = union_size;
		Ok(())
	}

	fn fix_field(&mut self, field: &mut FieldDef, scope: &Scope<'_>, in_pointer: bool) -> Result<()> {
		match field.r#type {
			FieldType::Message => {
				let index = self.resolve_message(field)?;
				if in_pointer && self.message_state[index] == State::Fixing {
					// Legal self-reference through a pointer; the
					// size is patched once the message is final.
					self.deferred = true;
					field.size = 0;
				} else {
					self.fix_message(index)?;
					field.size = self.schema.messages[index].size;
				}
				field.desc = FieldDescriptor::Message(MessageRef::Index(index));
			},
			FieldType::Array => {
				let size = {
					let field_name = field.name.clone();
					let FieldDescriptor::Array {
						element,
						count,
						capacity,
					} = &mut field.desc
					else {
						return Err(bad_payload(&field.name, "array"));
					};
					let capacity = *capacity;
					if !count.r#type.is_integer() {
						return Err(SchemaError::BadSubType {
							field: field_name,
							reason: String::from("array count must be an integer"),
						});
					}
					count.size = count.r#type.fixed_size().expect("integer width");
					count.offset = 0;
					self.fix_field(element, scope, in_pointer)?;
					element.offset = count.size;
					let max = count.r#type.max_unsigned().expect("integer range");
					if capacity as u64 > max {
						return Err(SchemaError::BadCount {
							field: field_name,
							max_count: capacity,
							count_type: count.r#type,
						});
					}
					count.size + capacity * element.size
				};
				field.size = size;
			},
			FieldType::Pointer => {
				let size = {
					let FieldDescriptor::Pointer {
						element,
						version,
					} = &mut field.desc
					else {
						return Err(bad_payload(&field.name, "pointer"));
					};
					let version = *version;
					// The payload layout is fixed for the codec's
					// sake; it never contributes to this body.
					self.fix_field(element, scope, true)?;
					element.offset = 0;
					version.header_size()
				};
				field.size = size;
			},
			FieldType::Union => {
				let FieldDescriptor::Union(r#ref) = &field.desc else {
					return Err(bad_payload(&field.name, "union"));
				};
				let resolved = self.resolve_union(&field.name, r#ref, scope)?;
				let size = match &resolved {
					UnionRef::Local(index) => scope.unions[*index].wire_size(),
					UnionRef::Global(index) => {
						self.fix_union(*index)?;
						self.schema.unions[*index].wire_size()
					},
					UnionRef::Named(_) => unreachable!("resolve_union returns indices"),
				};
				field.desc = FieldDescriptor::Union(resolved);
				field.size = size;
			},
			FieldType::Bytes => self.fix_bytes(field)?,
			_ => self.fix_scalar(field, scope)?,
		}
		Ok(())
	}

	fn fix_bytes(&self, field: &mut FieldDef) -> Result<()> {
		match field.sub_type {
			SubType::None | SubType::ByteString => {
				if !matches!(field.desc, FieldDescriptor::None) {
					return Err(bad_payload(&field.name, "bytes"));
				}
			},
			SubType::Bits => {
				let FieldDescriptor::Bits(bits) = &field.desc else {
					return Err(bad_payload(&field.name, "bits"));
				};
				let total = (field.size * 8) as u32;
				for bit in bits {
					if bit.offset + bit.size > total {
						return Err(SchemaError::BadBits {
							field: field.name.clone(),
							reason: format!(
								"bit field `{}` ends at bit {} beyond {} bits",
								bit.name,
								bit.offset + bit.size,
								total
							),
						});
					}
				}
				for (i, a) in bits.iter().enumerate() {
					for b in &bits[i + 1..] {
						if a.overlaps(b) {
							return Err(SchemaError::BadBits {
								field: field.name.clone(),
								reason: format!(
									"bit field `{}` overlaps `{}`",
									a.name, b.name
								),
							});
						}
					}
				}
			},
			other => {
				return Err(SchemaError::BadSubType {
					field: field.name.clone(),
					reason: format!("sub-type {other} is not valid on bytes"),
				});
			},
		}
		// The declared byte width is the size; nothing to derive.
		Ok(())
	}

	fn fix_scalar(&mut self, field: &mut FieldDef, scope: &Scope<'_>) -> Result<()> {
		match field.sub_type {
			SubType::Enum => {
				let FieldDescriptor::Enum(r#ref) = &field.desc else {
					return Err(bad_payload(&field.name, "enum"));
				};
				let resolved = self.resolve_enum(&field.name, r#ref, scope)?;
				let def = match &resolved {
					EnumRef::Local(index) => &scope.enums[*index],
					EnumRef::Global(index) => &self.schema.enums[*index],
					EnumRef::Named(_) => unreachable!("resolve_enum returns indices"),
				};
				// Storage follows the enum's underlying type.
				field.r#type = def.r#type;
				field.size = def.size;
				field.desc = FieldDescriptor::Enum(resolved);
			},
			SubType::FixedPoint => {
				if !field.r#type.is_integer() {
					return Err(SchemaError::BadSubType {
						field: field.name.clone(),
						reason: format!("fixed-point on non-integer type {}", field.r#type),
					});
				}
				let FieldDescriptor::FixedPoint {
					precision,
				} = &field.desc
				else {
					return Err(bad_payload(&field.name, "fixed-point"));
				};
				let digits = field.r#type.decimal_digits().expect("integer digits");
				if *precision > digits {
					return Err(SchemaError::BadSubType {
						field: field.name.clone(),
						reason: format!(
							"precision {} exceeds the {} digits of {}",
							precision, digits, field.r#type
						),
					});
				}
				field.size = field.r#type.fixed_size().expect("integer width");
			},
			SubType::TimePoint | SubType::Duration => {
				if !field.r#type.is_integer() {
					return Err(SchemaError::BadSubType {
						field: field.name.clone(),
						reason: format!("time sub-type on non-integer type {}", field.r#type),
					});
				}
				if !matches!(field.desc, FieldDescriptor::Time { .. }) {
					return Err(bad_payload(&field.name, "time"));
				}
				field.size = field.r#type.fixed_size().expect("integer width");
			},
			SubType::None => {
				if !matches!(field.desc, FieldDescriptor::None) {
					return Err(bad_payload(&field.name, "scalar"));
				}
				field.size = field.r#type.fixed_size().expect("scalar width");
			},
			other => {
				return Err(SchemaError::BadSubType {
					field: field.name.clone(),
					reason: format!("sub-type {other} is not valid on {}", field.r#type),
				});
			},
		}
		Ok(())
	}

	fn resolve_message(&self, field: &FieldDef) -> Result<usize> {
		let FieldDescriptor::Message(r#ref) = &field.desc else {
			return Err(bad_payload(&field.name, "message"));
		};
		match r#ref {
			MessageRef::Index(index) if *index < self.message_names.len() => Ok(*index),
			MessageRef::Index(index) => Err(SchemaError::Unresolved {
				entity: format!("field `{}`", field.name),
				name: format!("#{index}"),
			}),
			MessageRef::Named(name) => self
				.message_names
				.iter()
				.position(|n| !n.is_empty() && n == name)
				.ok_or_else(|| SchemaError::Unresolved {
					entity: format!("field `{}`", field.name),
					name: name.clone(),
				}),
		}
	}

	fn resolve_enum(&self, field: &str, r#ref: &EnumRef, scope: &Scope<'_>) -> Result<EnumRef> {
		match r#ref {
			EnumRef::Named(name) => {
				if let Some(index) = scope.enums.iter().position(|e| e.name == *name) {
					trace!(field, name = name.as_str(), "enum resolved locally");
					Ok(EnumRef::Local(index))
				} else if let Some(index) = self.schema.enums.iter().position(|e| e.name == *name) {
					Ok(EnumRef::Global(index))
				} else {
					Err(SchemaError::Unresolved {
						entity: format!("field `{field}`"),
						name: name.clone(),
					})
				}
			},
			EnumRef::Local(index) if *index < scope.enums.len() => Ok(EnumRef::Local(*index)),
			EnumRef::Global(index) if *index < self.schema.enums.len() => Ok(EnumRef::Global(*index)),
			EnumRef::Local(index) | EnumRef::Global(index) => Err(SchemaError::Unresolved {
				entity: format!("field `{field}`"),
				name: format!("#{index}"),
			}),
		}
	}

	fn resolve_union(&self, field: &str, r#ref: &UnionRef, scope: &Scope<'_>) -> Result<UnionRef> {
		match r#ref {
			UnionRef::Named(name) => {
				if let Some(index) = scope.unions.iter().position(|u| u.name == *name) {
					trace!(field, name = name.as_str(), "union resolved locally");
					Ok(UnionRef::Local(index))
				} else if let Some(index) = self.schema.unions.iter().position(|u| u.name == *name) {
					Ok(UnionRef::Global(index))
				} else {
					Err(SchemaError::Unresolved {
						entity: format!("field `{field}`"),
						name: name.clone(),
					})
				}
			},
			UnionRef::Local(index) if *index < scope.unions.len() => Ok(UnionRef::Local(*index)),
			UnionRef::Global(index) if *index < self.schema.unions.len() => Ok(UnionRef::Global(*index)),
			UnionRef::Local(index) | UnionRef::Global(index) => Err(SchemaError::Unresolved {
				entity: format!("field `{field}`"),
				name: format!("#{index}"),
			}),
		}
	}

	fn fix_aliases(&mut self) -> Result<()> {
		let mut aliases = mem::take(&mut self.schema.aliases);
		let mut result = Ok(());
		for alias in &mut aliases {
			result = self.fix_field(alias, &GLOBAL, false);
			if result.is_err() {
				break;
			}
		}
		self.schema.aliases = aliases;
		result
	}

	/// Final walk refreshing sizes inside pointer payload descriptors
	/// whose message references were deferred mid-fix. Only sizes inside
	/// pointer elements can change here; bodies and unions are already
	/// final because a pointer contributes only its header to them.
	fn patch_deferred(&mut self) {
		if !self.deferred {
			return;
		}
		let sizes: Vec<usize> = self.schema.messages.iter().map(|m| m.size).collect();
		for message in &mut self.schema.messages {
			for field in &mut message.fields {
				patch_field(field, &sizes);
			}
			for def in &mut message.unions {
				for variant in &mut def.fields {
					patch_field(variant, &sizes);
				}
			}
		}
		for def in &mut self.schema.unions {
			for variant in &mut def.fields {
				patch_field(variant, &sizes);
			}
		}
		for alias in &mut self.schema.aliases {
			patch_field(alias, &sizes);
		}
		self.deferred = false;
	}
}

fn patch_field(field: &mut FieldDef, sizes: &[usize]) {
	match &mut field.desc {
		FieldDescriptor::Pointer {
			element,
			..
		} => patch_pointer_element(element, sizes),
		FieldDescriptor::Array {
			element,
			..
		} => patch_field(element, sizes),
		_ => {},
	}
}

/// Recompute the size of a pointer element subtree now that every message
/// size is final.
fn patch_pointer_element(element: &mut FieldDef, sizes: &[usize]) {
	match &mut element.desc {
		FieldDescriptor::Message(MessageRef::Index(index)) => {
			if let Some(size) = sizes.get(*index) {
				element.size = *size;
			}
		},
		FieldDescriptor::Array {
			element: inner,
			count,
			capacity,
		} => {
			patch_pointer_element(inner, sizes);
			element.size = count.size + *capacity * inner.size;
		},
		FieldDescriptor::Pointer {
			element: inner,
			..
		} => patch_pointer_element(inner, sizes),
		_ => {},
	}
}

fn fix_enum(def: &mut EnumDef) -> Result<()> {
	if !def.r#type.is_integer() || def.r#type == FieldType::UInt64 {
		return Err(SchemaError::BadSubType {
			field: def.name.clone(),
			reason: format!("enum underlying type {} is not supported", def.r#type),
		});
	}
	def.size = def.r#type.fixed_size().expect("integer width");
	for value in &def.values {
		if !def.r#type.holds(value.value) {
			return Err(SchemaError::OutOfRange {
				what: format!("enum `{}` value `{}`", def.name, value.name),
				value: value.value as i128,
				max: def.r#type.max_unsigned().expect("integer range") as i128,
			});
		}
	}
	Ok(())
}

fn bad_payload(field: &str, expected: &str) -> SchemaError {
	SchemaError::BadSubType {
		field: field.to_owned(),
		reason: format!("descriptor does not match the declared {expected} type"),
	}
}

fn check_unique<'x>(scope: &str, names: impl Iterator<Item = &'x str>) -> Result<()> {
	let mut seen = HashSet::new();
	for name in names {
		if name.is_empty() {
			continue;
		}
		if !seen.insert(name) {
			return Err(SchemaError::Duplicate {
				scope: scope.to_owned(),
				name: name.to_owned(),
			});
		}
	}
	Ok(())
}
