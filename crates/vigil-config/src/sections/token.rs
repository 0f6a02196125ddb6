// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token verification configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use vigil_common_secret::SecretString;
use vigil_token::{Algorithm, KeySource, TokenConfig, DEFAULT_IDENTITY_CLAIM};

use crate::error::ConfigError;

/// Token configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenConfigLayer {
	#[serde(default)]
	pub secret: Option<SecretString>,
	#[serde(default)]
	pub algorithm: Option<String>,
	#[serde(default)]
	pub public_key_path: Option<PathBuf>,
	#[serde(default)]
	pub identity_claim: Option<String>,
	#[serde(default)]
	pub issuer: Option<String>,
	#[serde(default)]
	pub audience: Option<String>,
	#[serde(default)]
	pub leeway_secs: Option<u64>,
}

impl TokenConfigLayer {
	pub fn merge(&mut self, other: TokenConfigLayer) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
		if other.algorithm.is_some() {
			self.algorithm = other.algorithm;
		}
		if other.public_key_path.is_some() {
			self.public_key_path = other.public_key_path;
		}
		if other.identity_claim.is_some() {
			self.identity_claim = other.identity_claim;
		}
		if other.issuer.is_some() {
			self.issuer = other.issuer;
		}
		if other.audience.is_some() {
			self.audience = other.audience;
		}
		if other.leeway_secs.is_some() {
			self.leeway_secs = other.leeway_secs;
		}
	}

	/// A public key path wins over a secret; the validator rejects a key that
	/// does not fit the algorithm.
	pub fn finalize(self) -> Result<TokenConfig, ConfigError> {
		let algorithm = match self.algorithm.as_deref() {
			Some(name) => {
				Algorithm::from_str(name.trim()).map_err(|_| ConfigError::InvalidValue {
					key: "token.algorithm".to_string(),
					message: format!("unsupported algorithm '{name}'"),
				})?
			}
			None => Algorithm::HS256,
		};

		let key = match (self.public_key_path, self.secret) {
			(Some(path), _) => Some(KeySource::PublicKeyFile(path)),
			(None, Some(secret)) if !secret.is_empty() => Some(KeySource::Hmac(secret)),
			_ => None,
		};

		Ok(TokenConfig {
			algorithm,
			key,
			identity_claim: self
				.identity_claim
				.unwrap_or_else(|| DEFAULT_IDENTITY_CLAIM.to_string()),
			issuer: self.issuer,
			audience: self.audience,
			leeway_secs: self.leeway_secs.unwrap_or(0),
		})
	}
}
