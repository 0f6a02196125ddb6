// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Time sources for validity-window checks.

use chrono::{DateTime, Utc};
use std::fmt;

/// Source of "now" for token validity checks.
pub trait Clock: Send + Sync + fmt::Debug {
	fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
	pub fn new(now: DateTime<Utc>) -> Self {
		Self(now)
	}

	/// Pin the clock to a Unix timestamp in seconds.
	///
	/// Out-of-range timestamps pin to the Unix epoch.
	pub fn at_timestamp(secs: i64) -> Self {
		Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
	}
}

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}
