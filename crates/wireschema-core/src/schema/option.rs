// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;

/// A single `name[: value]` annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionDef {
	pub name: String,
	pub value: Option<String>,
}

impl OptionDef {
	pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
		Self {
			name: name.into(),
			value: value.map(Into::into),
		}
	}
}

/// Annotations attached to a schema entity, in declaration order.
///
/// Lookup is linear and the first match wins. A present option without a
/// value (`Some(None)`) is distinct from a missing option (`None`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Options(Vec<OptionDef>);

impl Options {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, option: OptionDef) {
		self.0.push(option);
	}

	pub fn get(&self, name: &str) -> Option<Option<&str>> {
		self.0.iter().find(|o| o.name == name).map(|o| o.value.as_deref())
	}

	pub fn has(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<OptionDef> for Options {
	fn from_iter<I: IntoIterator<Item = OptionDef>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Options {
		Options::from_iter([
			OptionDef::new("resolution", Some("us")),
			OptionDef::new("deprecated", None::<String>),
			OptionDef::new("resolution", Some("ns")),
		])
	}

	#[test]
	fn test_first_match_wins() {
		assert_eq!(sample().get("resolution"), Some(Some("us")));
	}

	#[test]
	fn test_missing_value_is_not_missing_option() {
		let options = sample();
		assert_eq!(options.get("deprecated"), Some(None));
		assert_eq!(options.get("absent"), None);
		assert!(options.has("deprecated"));
		assert!(!options.has("absent"));
	}

	#[test]
	fn test_declaration_order_preserved() {
		let names: Vec<_> = sample().iter().map(|o| o.name.clone()).collect();
		assert_eq!(names, ["resolution", "deprecated", "resolution"]);
	}
}
