// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Deterministic textual rendering of a schema.
//!
//! One line per entity, declaration order throughout, so two schemas with
//! equal semantic content render identically. Richer human-facing formats
//! are the host's concern.

use std::fmt::Write;

use super::{
	field::{EnumRef, FieldDef, FieldDescriptor, MessageRef, UnionRef},
	message::MessageDef,
	option::Options,
	r#enum::EnumDef,
	union::UnionDef,
	Schema,
};

pub(super) fn dump(schema: &Schema) -> String {
	let mut out = String::new();
	render_options(&mut out, "", &schema.options);
	for import in &schema.imports {
		writeln!(out, "import: {}", import.url).unwrap();
	}
	for def in &schema.enums {
		render_enum(&mut out, "", def);
	}
	for def in &schema.unions {
		render_union(&mut out, "", schema, None, def);
	}
	for alias in &schema.aliases {
		writeln!(out, "alias {}: {}", alias.name, field_label(schema, None, alias)).unwrap();
	}
	for message in &schema.messages {
		render_message(&mut out, schema, message);
	}
	out
}

fn render_options(out: &mut String, indent: &str, options: &Options) {
	if options.is_empty() {
		return;
	}
	write!(out, "{indent}options:").unwrap();
	for option in options.iter() {
		match &option.value {
			Some(value) => write!(out, " {}={}", option.name, value).unwrap(),
			None => write!(out, " {}", option.name).unwrap(),
		}
	}
	out.push('\n');
}

fn render_enum(out: &mut String, indent: &str, def: &EnumDef) {
	write!(out, "{indent}enum {}: {} [", def.name, def.r#type).unwrap();
	for (i, value) in def.values.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}
		write!(out, "{}={}", value.name, value.value).unwrap();
	}
	out.push_str("]\n");
	render_options(out, &format!("{indent}  "), &def.options);
}

fn render_union(out: &mut String, indent: &str, schema: &Schema, scope: Option<&MessageDef>, def: &UnionDef) {
	writeln!(
		out,
		"{indent}union {}: type={} size={}",
		def.name,
		def.type_ptr.r#type,
		def.wire_size()
	)
	.unwrap();
	for variant in &def.fields {
		writeln!(out, "{indent}  {}: {}", variant.name, field_label(schema, scope, variant)).unwrap();
	}
	render_options(out, &format!("{indent}  "), &def.options);
}

fn render_message(out: &mut String, schema: &Schema, message: &MessageDef) {
	writeln!(out, "message {}: id={} size={}", message.name, message.msgid, message.size).unwrap();
	render_options(out, "  ", &message.options);
	for def in &message.enums {
		render_enum(out, "  ", def);
	}
	for def in &message.unions {
		render_union(out, "  ", schema, Some(message), def);
	}
	for field in &message.fields {
		writeln!(
			out,
			"  {}: {} offset={} size={}",
			field.name,
			field_label(schema, Some(message), field),
			field.offset,
			field.size
		)
		.unwrap();
	}
}

/// Compact one-line type label for a field, recursing into array and
/// pointer elements.
fn field_label(schema: &Schema, scope: Option<&MessageDef>, field: &FieldDef) -> String {
	match &field.desc {
		FieldDescriptor::None => match field.sub_type {
			wireschema_type::SubType::ByteString => format!("byte_string[{}]", field.size),
			_ if field.r#type == wireschema_type::FieldType::Bytes => {
				format!("bytes[{}]", field.size)
			},
			_ => field.r#type.to_string(),
		},
		FieldDescriptor::Message(r#ref) => {
			let name = match r#ref {
				MessageRef::Named(name) => name.clone(),
				MessageRef::Index(index) => schema
					.messages
					.get(*index)
					.map(|m| m.name.clone())
					.unwrap_or_else(|| format!("#{index}")),
			};
			format!("message {name}")
		},
		FieldDescriptor::Array {
			element,
			count,
			capacity,
		} => {
			format!(
				"array[{capacity}] of {}, count {}",
				field_label(schema, scope, element),
				count.r#type
			)
		},
		FieldDescriptor::Pointer {
			element,
			version,
		} => {
			format!("pointer({version}) to {}", field_label(schema, scope, element))
		},
		FieldDescriptor::Union(r#ref) => {
			let name = match r#ref {
				UnionRef::Named(name) => name.clone(),
				_ => schema
					.union_at(scope, r#ref)
					.map(|u| u.name.clone())
					.unwrap_or_else(|| String::from("?")),
			};
			format!("union {name}")
		},
		FieldDescriptor::Enum(r#ref) => {
			let name = match r#ref {
				EnumRef::Named(name) => name.clone(),
				_ => schema
					.enum_at(scope, r#ref)
					.map(|e| e.name.clone())
					.unwrap_or_else(|| String::from("?")),
			};
			format!("enum {name}")
		},
		FieldDescriptor::FixedPoint {
			precision,
		} => {
			format!("fixed_point({}, {precision})", field.r#type)
		},
		FieldDescriptor::Time {
			resolution,
		} => match field.sub_type {
			wireschema_type::SubType::Duration => format!("duration({}, {resolution})", field.r#type),
			_ => format!("time_point({}, {resolution})", field.r#type),
		},
		FieldDescriptor::Bits(bits) => {
			let mut label = format!("bits[{}] {{", field.size);
			for (i, bit) in bits.iter().enumerate() {
				if i > 0 {
					label.push_str(", ");
				}
				write!(label, "{}:{}+{}", bit.name, bit.offset, bit.size).unwrap();
			}
			label.push('}');
			label
		},
	}
}
