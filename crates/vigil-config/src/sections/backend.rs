// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend selection.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which policy source answers decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
	#[default]
	Local,
	Remote,
}

impl FromStr for BackendMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"local" => Ok(BackendMode::Local),
			"remote" => Ok(BackendMode::Remote),
			other => Err(format!("expected 'local' or 'remote', got '{other}'")),
		}
	}
}

impl fmt::Display for BackendMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			BackendMode::Local => "local",
			BackendMode::Remote => "remote",
		})
	}
}

/// Backend configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfigLayer {
	#[serde(default)]
	pub mode: Option<BackendMode>,
}

impl BackendConfigLayer {
	pub fn merge(&mut self, other: BackendConfigLayer) {
		if other.mode.is_some() {
			self.mode = other.mode;
		}
	}

	pub fn finalize(self) -> BackendMode {
		self.mode.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_mode_is_local() {
		assert_eq!(BackendConfigLayer::default().finalize(), BackendMode::Local);
	}

	#[test]
	fn test_parse_mode() {
		assert_eq!("Remote".parse::<BackendMode>(), Ok(BackendMode::Remote));
		assert!("db".parse::<BackendMode>().is_err());
	}

	#[test]
	fn test_merge_overrides() {
		let mut base = BackendConfigLayer {
			mode: Some(BackendMode::Local),
		};
		base.merge(BackendConfigLayer {
			mode: Some(BackendMode::Remote),
		});
		assert_eq!(base.finalize(), BackendMode::Remote);
	}
}
