// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod encoded;
mod fix;
pub mod loader;
pub mod schema;

pub use encoded::{
	buf::EncodedMessage,
	pointer::{alloc_pointer, read_pointer, write_pointer, write_pointer_size, OffsetPtr},
	size::{read_size, write_size},
	view::{View, ViewMut},
};
pub use loader::{load_url, SchemaLoader};
pub use schema::{
	field::{EnumRef, FieldDef, FieldDescriptor, MessageRef, UnionRef},
	message::MessageDef,
	option::{OptionDef, Options},
	r#enum::{EnumDef, EnumValueDef},
	union::UnionDef,
	ImportDef, Schema, SharedSchema,
};
pub use schema::bits::BitFieldDef;
pub use wireschema_type::{
	FieldType, PointerVersion, Result, SchemaError, SubType, TimeResolution,
};
