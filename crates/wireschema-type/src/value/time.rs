// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Resolution of a time-point or duration field.
///
/// The stored integer counts units of this resolution; the reader applies
/// the scale.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeResolution {
	Ns,
	Us,
	Ms,
	Second,
	Minute,
	Hour,
	Day,
}

impl TimeResolution {
	pub const fn as_str(&self) -> &'static str {
		match self {
			TimeResolution::Ns => "ns",
			TimeResolution::Us => "us",
			TimeResolution::Ms => "ms",
			TimeResolution::Second => "s",
			TimeResolution::Minute => "m",
			TimeResolution::Hour => "h",
			TimeResolution::Day => "d",
		}
	}
}

impl Display for TimeResolution {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TimeResolution {
	type Err = ();

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"ns" => Ok(TimeResolution::Ns),
			"us" => Ok(TimeResolution::Us),
			"ms" => Ok(TimeResolution::Ms),
			"s" => Ok(TimeResolution::Second),
			"m" => Ok(TimeResolution::Minute),
			"h" => Ok(TimeResolution::Hour),
			"d" => Ok(TimeResolution::Day),
			_ => Err(()),
		}
	}
}
