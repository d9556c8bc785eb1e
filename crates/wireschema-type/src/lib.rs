// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod error;
pub mod value;

pub use error::SchemaError;
pub use value::{
	field_type::FieldType,
	pointer::PointerVersion,
	sub_type::SubType,
	time::TimeResolution,
};

pub type Result<T> = std::result::Result<T, SchemaError>;
