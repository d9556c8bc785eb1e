// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! URL-prefix dispatch for schema sources.
//!
//! The actual loaders (file readers, inline text, embedded resources) live
//! with the host; the core only picks one by URL scheme and passes its
//! `Io`/`Parse` errors through unchanged.

use tracing::trace;
use wireschema_type::{Result, SchemaError};

use crate::schema::Schema;

/// One way of producing a schema from a URL, selected by scheme prefix.
pub trait SchemaLoader {
	/// URL scheme this loader answers to, without the `://` separator.
	fn scheme(&self) -> &str;

	/// Produce an unfixed schema; callers run [`Schema::fix`] afterwards.
	fn load(&self, url: &str) -> Result<Schema>;
}

/// Split `scheme://rest`, tolerating bare paths by treating them as an
/// empty scheme.
fn split_scheme(url: &str) -> &str {
	url.split_once("://").map(|(scheme, _)| scheme).unwrap_or("")
}

/// Pick the loader matching the URL's scheme and delegate to it.
pub fn load_url(url: &str, loaders: &[&dyn SchemaLoader]) -> Result<Schema> {
	let scheme = split_scheme(url);
	for loader in loaders {
		if loader.scheme() == scheme {
			trace!(url, scheme, "loader selected");
			return loader.load(url);
		}
	}
	Err(SchemaError::Io {
		url: url.to_owned(),
		reason: format!("no loader for scheme `{scheme}`"),
	})
}
