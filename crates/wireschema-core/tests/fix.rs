// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! End-to-end layout scenarios for the fix pass.

use wireschema_core::{
	read_size, write_size, BitFieldDef, EncodedMessage, EnumDef, FieldDef, FieldType, MessageDef,
	PointerVersion, Schema, SchemaError, SubType, TimeResolution, UnionDef,
};

fn schema_with(messages: impl IntoIterator<Item = MessageDef>) -> Schema {
	let mut schema = Schema::new();
	schema.messages.extend(messages);
	schema
}

#[test]
fn test_simple_message_layout() {
	let mut schema = schema_with([MessageDef::with_fields(
		"Tick",
		10,
		[FieldDef::scalar("price", FieldType::Int32), FieldDef::scalar("qty", FieldType::UInt16)],
	)]);
	schema.fix().unwrap();

	let tick = schema.message("Tick").unwrap();
	assert_eq!(tick.size, 6);
	let price = tick.field("price").unwrap();
	let qty = tick.field("qty").unwrap();
	assert_eq!((price.offset, price.size), (0, 4));
	assert_eq!((qty.offset, qty.size), (4, 2));
}

#[test]
fn test_message_size_is_last_offset_plus_size() {
	let mut schema = schema_with([MessageDef::with_fields(
		"M",
		1,
		[
			FieldDef::scalar("a", FieldType::Double),
			FieldDef::bytes("tag", 3),
			FieldDef::scalar("b", FieldType::Decimal128),
		],
	)]);
	schema.fix().unwrap();
	let m = schema.message("M").unwrap();
	let last = m.fields.last().unwrap();
	assert_eq!(m.size, last.offset + last.size);
	assert_eq!(m.size, 8 + 3 + 16);
}

#[test]
fn test_empty_message_is_permitted() {
	let mut schema = schema_with([MessageDef::new("Heartbeat", 2)]);
	schema.fix().unwrap();
	assert_eq!(schema.message("Heartbeat").unwrap().size, 0);
}

#[test]
fn test_embedded_message_and_forward_reference() {
	// Outer is declared before the message it embeds.
	let mut schema = schema_with([
		MessageDef::with_fields(
			"Outer",
			1,
			[FieldDef::message("tick", "Tick"), FieldDef::scalar("flag", FieldType::UInt8)],
		),
		MessageDef::with_fields(
			"Tick",
			2,
			[FieldDef::scalar("price", FieldType::Int32), FieldDef::scalar("qty", FieldType::UInt16)],
		),
	]);
	schema.fix().unwrap();

	let outer = schema.message("Outer").unwrap();
	assert_eq!(outer.size, 7);
	let tick = outer.field("tick").unwrap();
	assert_eq!((tick.offset, tick.size), (0, 6));
	assert_eq!(outer.field("flag").unwrap().offset, 6);
}

#[test]
fn test_union_layout() {
	let mut message = MessageDef::with_fields("Quote", 3, [FieldDef::union_type("value", "V")]);
	message.unions.push(UnionDef::new(
		"V",
		FieldType::UInt8,
		[FieldDef::scalar("a", FieldType::Int32), FieldDef::bytes("b", 8)],
	));
	let mut schema = schema_with([message]);
	schema.fix().unwrap();

	let quote = schema.message("Quote").unwrap();
	let union = &quote.unions[0];
	assert_eq!(union.union_size, 8);
	assert_eq!(union.wire_size(), 9);
	assert_eq!(quote.field("value").unwrap().size, 9);
	assert_eq!(quote.size, 9);
	// Both variants start right after the discriminator.
	assert!(union.fields.iter().all(|v| v.offset == 1));
}

#[test]
fn test_union_discriminator_must_be_integer() {
	let mut message = MessageDef::with_fields("M", 1, [FieldDef::union_type("v", "V")]);
	message.unions.push(UnionDef::new("V", FieldType::Double, [FieldDef::scalar("a", FieldType::Int32)]));
	let mut schema = schema_with([message]);
	assert!(matches!(schema.fix(), Err(SchemaError::BadSubType { .. })));
}

#[test]
fn test_global_union_through_message_field() {
	let mut schema = schema_with([MessageDef::with_fields("M", 1, [FieldDef::union_type("v", "Shared")])]);
	schema.unions.push(UnionDef::new(
		"Shared",
		FieldType::UInt16,
		[FieldDef::scalar("x", FieldType::Int64)],
	));
	schema.fix().unwrap();
	assert_eq!(schema.message("M").unwrap().size, 2 + 8);
}

#[test]
fn test_enum_width_and_storage() {
	let mut schema = schema_with([MessageDef::with_fields("M", 1, [FieldDef::enum_type("e", "E")])]);
	schema.enums.push(EnumDef::with_values("E", FieldType::UInt16, [("A", 0), ("B", 42000)]));
	schema.fix().unwrap();

	assert_eq!(schema.enums[0].size, 2);
	let field = schema.message("M").unwrap().field("e").unwrap();
	assert_eq!(field.r#type, FieldType::UInt16);
	assert_eq!(field.size, 2);

	// Storing the largest declared value round-trips through the
	// size reader.
	let mut buf = EncodedMessage::new(field.size);
	write_size(field, &mut buf.view_mut(field.offset), 42000).unwrap();
	assert_eq!(read_size(field, &buf.view(field.offset)).unwrap(), 42000);
}

#[test]
fn test_local_enum_shadows_global() {
	let mut message = MessageDef::with_fields("M", 1, [FieldDef::enum_type("side", "side")]);
	message.enums.push(EnumDef::with_values("side", FieldType::UInt8, [("buy", 0)]));
	let mut schema = schema_with([
		message,
		MessageDef::with_fields("N", 2, [FieldDef::enum_type("side", "side")]),
	]);
	schema.enums.push(EnumDef::with_values("side", FieldType::UInt32, [("buy", 0)]));
	schema.fix().unwrap();

	// M sees its local 1-byte enum, N falls back to the global 4-byte
	// one.
	assert_eq!(schema.message("M").unwrap().field("side").unwrap().size, 1);
	assert_eq!(schema.message("N").unwrap().field("side").unwrap().size, 4);
}

#[test]
fn test_array_layout_and_count() {
	let mut schema = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::array("values", FieldDef::scalar("value", FieldType::Int32), FieldType::UInt8, 4)],
	)]);
	schema.fix().unwrap();

	let array = schema.message("M").unwrap().field("values").unwrap();
	assert_eq!(array.size, 1 + 4 * 4);
	assert_eq!(array.array_count().unwrap().offset, 0);
	assert_eq!(array.array_element().unwrap().offset, 1);
	assert!(!array.is_variable());
}

#[test]
fn test_array_capacity_must_fit_count_type() {
	let mut schema = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::array("values", FieldDef::scalar("value", FieldType::UInt8), FieldType::Int8, 300)],
	)]);
	match schema.fix() {
		Err(SchemaError::BadCount {
			max_count,
			count_type,
			..
		}) => {
			assert_eq!(max_count, 300);
			assert_eq!(count_type, FieldType::Int8);
		},
		other => panic!("expected BadCount, got {other:?}"),
	}
}

#[test]
fn test_pointer_is_header_sized_and_variable() {
	for (version, expected) in [
		(PointerVersion::Default, 8),
		(PointerVersion::LegacyShort, 4),
		(PointerVersion::LegacyLong, 8),
	] {
		let mut schema = schema_with([MessageDef::with_fields(
			"M",
			1,
			[FieldDef::pointer("items", FieldDef::scalar("item", FieldType::UInt16), version)],
		)]);
		schema.fix().unwrap();
		let field = schema.message("M").unwrap().field("items").unwrap();
		assert_eq!(field.size, expected);
		assert!(field.is_variable());
		assert_eq!(field.pointer_element().unwrap().size, 2);
	}
}

#[test]
fn test_pointer_self_reference_is_legal() {
	let mut schema = schema_with([MessageDef::with_fields(
		"List",
		1,
		[
			FieldDef::scalar("value", FieldType::Int32),
			FieldDef::pointer("next", FieldDef::message("node", "List"), PointerVersion::Default),
		],
	)]);
	schema.fix().unwrap();

	let list = schema.message("List").unwrap();
	assert_eq!(list.size, 4 + 8);
	// The element stride reflects the final message size.
	assert_eq!(list.field("next").unwrap().pointer_element().unwrap().size, 12);
}

#[test]
fn test_mutual_pointer_recursion_is_legal() {
	let mut schema = schema_with([
		MessageDef::with_fields(
			"A",
			1,
			[
				FieldDef::scalar("a", FieldType::UInt8),
				FieldDef::pointer("bs", FieldDef::message("b", "B"), PointerVersion::Default),
			],
		),
		MessageDef::with_fields(
			"B",
			2,
			[
				FieldDef::scalar("b", FieldType::UInt64),
				FieldDef::pointer("as", FieldDef::message("a", "A"), PointerVersion::Default),
			],
		),
	]);
	schema.fix().unwrap();
	assert_eq!(schema.message("A").unwrap().size, 9);
	assert_eq!(schema.message("B").unwrap().size, 16);
	let a = schema.message("A").unwrap();
	assert_eq!(a.field("bs").unwrap().pointer_element().unwrap().size, 16);
	let b = schema.message("B").unwrap();
	assert_eq!(b.field("as").unwrap().pointer_element().unwrap().size, 9);
}

#[test]
fn test_by_value_cycle_is_rejected() {
	let mut schema = schema_with([
		MessageDef::with_fields("A", 1, [FieldDef::message("b", "B")]),
		MessageDef::with_fields("B", 2, [FieldDef::message("a", "A")]),
	]);
	match schema.fix() {
		Err(SchemaError::Cycle {
			message,
		}) => assert_eq!(message, "A"),
		other => panic!("expected Cycle, got {other:?}"),
	}
}

#[test]
fn test_unknown_type_name_is_unresolved() {
	let mut schema = schema_with([MessageDef::with_fields("M", 1, [FieldDef::message("x", "Missing")])]);
	match schema.fix() {
		Err(SchemaError::Unresolved {
			entity,
			name,
		}) => {
			assert_eq!(entity, "field `x`");
			assert_eq!(name, "Missing");
		},
		other => panic!("expected Unresolved, got {other:?}"),
	}
}

#[test]
fn test_fixed_point_validation() {
	let mut ok = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::fixed_point("price", FieldType::Int32, 2)],
	)]);
	ok.fix().unwrap();
	assert_eq!(ok.message("M").unwrap().field("price").unwrap().size, 4);

	let mut too_precise = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::fixed_point("price", FieldType::Int8, 5)],
	)]);
	assert!(matches!(too_precise.fix(), Err(SchemaError::BadSubType { .. })));

	let mut on_double = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::fixed_point("price", FieldType::Double, 2)],
	)]);
	assert!(matches!(on_double.fix(), Err(SchemaError::BadSubType { .. })));
}

#[test]
fn test_time_sub_types_require_integers() {
	let mut ok = schema_with([MessageDef::with_fields(
		"M",
		1,
		[
			FieldDef::time_point("ts", FieldType::Int64, TimeResolution::Us),
			FieldDef::duration("ttl", FieldType::UInt32, TimeResolution::Second),
		],
	)]);
	ok.fix().unwrap();
	let m = ok.message("M").unwrap();
	assert_eq!(m.field("ts").unwrap().size, 8);
	assert_eq!(m.field("ttl").unwrap().size, 4);
	assert_eq!(m.field("ts").unwrap().sub_type, SubType::TimePoint);

	let mut on_double = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::time_point("ts", FieldType::Double, TimeResolution::Ns)],
	)]);
	assert!(matches!(on_double.fix(), Err(SchemaError::BadSubType { .. })));
}

#[test]
fn test_bit_fields_validation() {
	let mut ok = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::bits(
			"flags",
			1,
			vec![BitFieldDef::new("lo", 0, 4), BitFieldDef::new("hi", 4, 4)],
		)],
	)]);
	ok.fix().unwrap();
	assert_eq!(ok.message("M").unwrap().field("flags").unwrap().size, 1);

	let mut overlapping = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::bits(
			"flags",
			1,
			vec![BitFieldDef::new("lo", 0, 5), BitFieldDef::new("hi", 4, 4)],
		)],
	)]);
	assert!(matches!(overlapping.fix(), Err(SchemaError::BadBits { .. })));

	let mut out_of_range = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::bits("flags", 1, vec![BitFieldDef::new("wide", 6, 4)])],
	)]);
	assert!(matches!(out_of_range.fix(), Err(SchemaError::BadBits { .. })));
}

#[test]
fn test_duplicate_names_are_rejected() {
	let mut messages = schema_with([MessageDef::new("M", 1), MessageDef::new("M", 2)]);
	assert!(matches!(messages.fix(), Err(SchemaError::Duplicate { .. })));

	let mut fields = schema_with([MessageDef::with_fields(
		"M",
		1,
		[FieldDef::scalar("x", FieldType::Int8), FieldDef::scalar("x", FieldType::Int8)],
	)]);
	assert!(matches!(fields.fix(), Err(SchemaError::Duplicate { .. })));
}

#[test]
fn test_byte_string_keeps_declared_width() {
	let mut schema = schema_with([MessageDef::with_fields("M", 1, [FieldDef::byte_string("name", 32)])]);
	schema.fix().unwrap();
	let field = schema.message("M").unwrap().field("name").unwrap();
	assert_eq!(field.size, 32);
	assert_eq!(field.sub_type, SubType::ByteString);
}

#[test]
fn test_aliases_fix_after_messages() {
	let mut schema = schema_with([MessageDef::with_fields(
		"Tick",
		1,
		[FieldDef::scalar("price", FieldType::Int32)],
	)]);
	schema.aliases.push(FieldDef::message("tick_ref", "Tick"));
	schema.fix().unwrap();
	assert_eq!(schema.aliases[0].size, 4);
}

#[test]
fn test_fix_is_idempotent() {
	let mut message = MessageDef::with_fields(
		"Order",
		7,
		[
			FieldDef::enum_type("side", "side"),
			FieldDef::array("legs", FieldDef::scalar("leg", FieldType::Int64), FieldType::UInt16, 3),
			FieldDef::pointer("notes", FieldDef::scalar("ch", FieldType::UInt8), PointerVersion::Default),
		],
	);
	message.enums.push(EnumDef::with_values("side", FieldType::UInt8, [("buy", 0), ("sell", 1)]));
	let mut schema = schema_with([message]);

	schema.fix().unwrap();
	let first = schema.dump();
	schema.fix().unwrap();
	assert_eq!(schema.dump(), first);
}

#[test]
fn test_copy_preserves_dump() {
	let mut message = MessageDef::with_fields(
		"Order",
		7,
		[FieldDef::enum_type("side", "side"), FieldDef::scalar("qty", FieldType::UInt32)],
	);
	message.enums.push(EnumDef::with_values("side", FieldType::UInt8, [("buy", 0)]));
	let mut schema = schema_with([message]);
	schema.fix().unwrap();

	let copy = schema.copy();
	assert_eq!(copy.dump(), schema.dump());
}

#[test]
fn test_fix_single_message_subtree() {
	let mut schema = schema_with([
		MessageDef::with_fields("Tick", 1, [FieldDef::scalar("price", FieldType::Int32)]),
		MessageDef::with_fields("Other", 2, [FieldDef::scalar("x", FieldType::Int64)]),
	]);
	schema.fix_message("Tick").unwrap();
	assert_eq!(schema.message("Tick").unwrap().size, 4);
	// The sibling was not touched.
	assert_eq!(schema.message("Other").unwrap().size, 0);

	assert!(matches!(schema.fix_message("Missing"), Err(SchemaError::Unresolved { .. })));
}
