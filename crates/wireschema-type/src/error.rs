// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::value::field_type::FieldType;

/// Everything the fix pass or a codec primitive can reject.
///
/// The fix pass stops at the first violation and names the offending
/// entity; codec writes that fail leave the buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("{what}: value {value} does not fit, maximum is {max}")]
	OutOfRange {
		what: String,
		value: i128,
		max: i128,
	},

	#[error("{entity}: reference to unknown type `{name}`")]
	Unresolved {
		entity: String,
		name: String,
	},

	#[error("message `{message}` contains itself by value")]
	Cycle {
		message: String,
	},

	#[error("field `{field}`: {reason}")]
	BadSubType {
		field: String,
		reason: String,
	},

	#[error("field `{field}`: {reason}")]
	BadBits {
		field: String,
		reason: String,
	},

	#[error("field `{field}`: capacity {max_count} does not fit count type {count_type}")]
	BadCount {
		field: String,
		max_count: usize,
		count_type: FieldType,
	},

	#[error("duplicate name `{name}` in {scope}")]
	Duplicate {
		scope: String,
		name: String,
	},

	#[error("access at {index} beyond buffer of {length} bytes")]
	OutOfBounds {
		index: usize,
		length: usize,
	},

	#[error("parse error: {reason}")]
	Parse {
		reason: String,
	},

	#[error("failed to load `{url}`: {reason}")]
	Io {
		url: String,
		reason: String,
	},
}
