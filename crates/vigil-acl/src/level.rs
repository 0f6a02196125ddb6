// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access levels.
//!
//! Levels form a total order: a grant satisfies a request iff
//! `granted >= requested`. There are no partial grants and no bitmask
//! semantics; a store that wants combined levels expresses them as higher
//! integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered access level as requested by a client or granted by a policy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(i64);

impl AccessLevel {
	/// Subscribe / read.
	pub const READ: AccessLevel = AccessLevel(1);
	/// Publish / write.
	pub const WRITE: AccessLevel = AccessLevel(2);

	pub const fn new(level: i64) -> Self {
		Self(level)
	}

	pub const fn value(self) -> i64 {
		self.0
	}

	/// True when a grant at this level covers a request at `requested`.
	pub fn satisfies(self, requested: AccessLevel) -> bool {
		self.0 >= requested.0
	}
}

impl From<i64> for AccessLevel {
	fn from(level: i64) -> Self {
		Self(level)
	}
}

impl From<AccessLevel> for i64 {
	fn from(level: AccessLevel) -> Self {
		level.0
	}
}

impl fmt::Display for AccessLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Returns true when `granted` covers `requested` (`granted >= requested`).
pub fn satisfies(granted: AccessLevel, requested: AccessLevel) -> bool {
	granted.satisfies(requested)
}
