// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control entries and their evaluation against a request.

use crate::level::AccessLevel;
use crate::topic::matches;

/// A stored grant: a topic filter and the level it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
	pub filter: String,
	pub granted: AccessLevel,
}

impl AclEntry {
	pub fn new(filter: impl Into<String>, granted: AccessLevel) -> Self {
		Self {
			filter: filter.into(),
			granted,
		}
	}

	/// True when this entry covers `topic` at `requested`.
	pub fn permits(&self, topic: &str, requested: AccessLevel) -> bool {
		self.granted.satisfies(requested) && matches(&self.filter, topic)
	}
}

/// True when any entry covers `topic` at `requested`.
///
/// Entries have no precedence; one covering entry is enough.
pub fn evaluate(entries: &[AclEntry], topic: &str, requested: AccessLevel) -> bool {
	entries.iter().any(|entry| entry.permits(topic, requested))
}
