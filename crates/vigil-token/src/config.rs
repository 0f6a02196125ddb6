// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token verification settings.

use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use vigil_common_secret::SecretString;

/// Claim that carries the identity unless configured otherwise.
pub const DEFAULT_IDENTITY_CLAIM: &str = "username";

/// Where the verification key comes from.
#[derive(Debug, Clone)]
pub enum KeySource {
	/// Shared secret for the HMAC family (HS256/384/512).
	Hmac(SecretString),
	/// PEM-encoded public key for RSA, RSA-PSS, ECDSA or EdDSA.
	PublicKeyPem(String),
	/// Path to a PEM-encoded public key, read once at construction.
	PublicKeyFile(PathBuf),
}

/// Settings for [`crate::TokenValidator`].
#[derive(Debug, Clone)]
pub struct TokenConfig {
	pub algorithm: Algorithm,
	pub key: Option<KeySource>,
	/// Name of the claim holding the identity, e.g. `username` or `sub`.
	pub identity_claim: String,
	/// When set, tokens must carry exactly this `iss`.
	pub issuer: Option<String>,
	/// When set, tokens must list this value in `aud`.
	pub audience: Option<String>,
	/// Tolerated clock skew, in seconds, on both ends of the validity window.
	pub leeway_secs: u64,
}

impl Default for TokenConfig {
	fn default() -> Self {
		Self {
			algorithm: Algorithm::HS256,
			key: None,
			identity_claim: DEFAULT_IDENTITY_CLAIM.to_string(),
			issuer: None,
			audience: None,
			leeway_secs: 0,
		}
	}
}

impl TokenConfig {
	/// HS256 with the given shared secret and default settings otherwise.
	pub fn hmac(secret: impl Into<String>) -> Self {
		Self {
			key: Some(KeySource::Hmac(SecretString::new(secret.into()))),
			..Default::default()
		}
	}

	pub fn with_identity_claim(mut self, claim: impl Into<String>) -> Self {
		self.identity_claim = claim.into();
		self
	}

	pub fn with_leeway_secs(mut self, leeway_secs: u64) -> Self {
		self.leeway_secs = leeway_secs;
		self
	}

	/// True when key material is configured at all.
	pub fn has_key(&self) -> bool {
		match &self.key {
			Some(KeySource::Hmac(secret)) => !secret.is_empty(),
			Some(_) => true,
			None => false,
		}
	}
}
