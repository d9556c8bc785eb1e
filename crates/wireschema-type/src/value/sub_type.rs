// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Semantic annotation overlaid on a base [`FieldType`](super::field_type::FieldType).
///
/// The sub-type never changes the storage layout; it tells readers how to
/// interpret the stored value.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubType {
	#[default]
	None,
	/// Integer storage holding a named enumeration value
	Enum,
	/// Bytes storage holding NUL-terminated text
	ByteString,
	/// Integer storage scaled by 10^-precision
	FixedPoint,
	/// Integer storage counting resolution units since the epoch
	TimePoint,
	/// Integer storage counting resolution units
	Duration,
	/// Bytes storage carved into named bit ranges
	Bits,
}

impl Display for SubType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SubType::None => "none",
			SubType::Enum => "enum",
			SubType::ByteString => "byte_string",
			SubType::FixedPoint => "fixed_point",
			SubType::TimePoint => "time_point",
			SubType::Duration => "duration",
			SubType::Bits => "bits",
		})
	}
}
