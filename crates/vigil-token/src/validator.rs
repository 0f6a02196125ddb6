// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JWT verification.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::config::{KeySource, TokenConfig};
use crate::error::{TokenConfigError, TokenError};

/// Whether the validity window is enforced for a verification.
///
/// The signature is verified either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryCheck {
	Enforce,
	Skip,
}

/// Verifies bearer tokens against configured key material.
///
/// Cheap to clone and safe to share between tasks; verification takes no locks.
#[derive(Clone)]
pub struct TokenValidator {
	key: DecodingKey,
	validation: Validation,
	identity_claim: String,
	leeway_secs: u64,
	clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenValidator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenValidator")
			.field("algorithms", &self.validation.algorithms)
			.field("identity_claim", &self.identity_claim)
			.field("leeway_secs", &self.leeway_secs)
			.field("clock", &self.clock)
			.finish_non_exhaustive()
	}
}

impl TokenValidator {
	/// Build a validator, loading key material once.
	///
	/// # Errors
	///
	/// Returns [`TokenConfigError`] when the key is missing, unreadable, does not
	/// fit the algorithm family, or the identity claim name is empty.
	#[instrument(skip_all, fields(algorithm = ?config.algorithm, identity_claim = %config.identity_claim))]
	pub fn new(config: &TokenConfig) -> Result<Self, TokenConfigError> {
		if config.identity_claim.is_empty() {
			return Err(TokenConfigError::EmptyIdentityClaim);
		}

		let key = decoding_key(config)?;

		let mut validation = Validation::new(config.algorithm);
		// The window is checked against the injected clock instead.
		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.required_spec_claims = HashSet::new();
		validation.leeway = 0;

		if let Some(issuer) = &config.issuer {
			validation.set_issuer(&[issuer]);
		}

		match &config.audience {
			Some(audience) => validation.set_audience(&[audience]),
			None => validation.validate_aud = false,
		}

		debug!("token validator ready");

		Ok(Self {
			key,
			validation,
			identity_claim: config.identity_claim.clone(),
			leeway_secs: config.leeway_secs,
			clock: Arc::new(SystemClock),
		})
	}

	/// Replace the time source used for validity-window checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	pub fn identity_claim(&self) -> &str {
		&self.identity_claim
	}

	/// Verify signature, validity window and identity of `token`.
	pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
		self.verify_with(token, ExpiryCheck::Enforce)
	}

	/// Verify `token`, optionally skipping the validity-window check.
	pub fn verify_with(&self, token: &str, expiry: ExpiryCheck) -> Result<Claims, TokenError> {
		let data = decode::<Map<String, Value>>(token, &self.key, &self.validation)?;
		let claims = Claims::from_payload(data.claims, &self.identity_claim)?;

		if expiry == ExpiryCheck::Enforce {
			claims.check_window(self.clock.now(), self.leeway_secs)?;
		}

		Ok(claims)
	}
}

fn decoding_key(config: &TokenConfig) -> Result<DecodingKey, TokenConfigError> {
	let algorithm = config.algorithm;
	let source = config
		.key
		.as_ref()
		.ok_or(TokenConfigError::MissingKey { algorithm })?;

	match (family(algorithm), source) {
		(KeyFamily::Hmac, KeySource::Hmac(secret)) => {
			if secret.is_empty() {
				return Err(TokenConfigError::MissingKey { algorithm });
			}
			Ok(DecodingKey::from_secret(secret.expose().as_bytes()))
		}
		(KeyFamily::Hmac, _) => Err(TokenConfigError::KeyMismatch {
			algorithm,
			expected: "a shared secret",
		}),
		(_, KeySource::Hmac(_)) => Err(TokenConfigError::KeyMismatch {
			algorithm,
			expected: "a PEM public key",
		}),
		(_, KeySource::PublicKeyPem(pem)) => public_key(algorithm, pem.as_bytes()),
		(_, KeySource::PublicKeyFile(path)) => {
			let pem = std::fs::read(path).map_err(|source| TokenConfigError::KeyFile {
				path: path.clone(),
				source,
			})?;
			public_key(algorithm, &pem)
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum KeyFamily {
	Hmac,
	Rsa,
	Ec,
	Ed,
}

fn family(algorithm: Algorithm) -> KeyFamily {
	match algorithm {
		Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
		Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
		Algorithm::EdDSA => KeyFamily::Ed,
		_ => KeyFamily::Rsa,
	}
}

fn public_key(algorithm: Algorithm, pem: &[u8]) -> Result<DecodingKey, TokenConfigError> {
	let key = match family(algorithm) {
		KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem),
		KeyFamily::Ec => DecodingKey::from_ec_pem(pem),
		KeyFamily::Ed => DecodingKey::from_ed_pem(pem),
		KeyFamily::Hmac => {
			return Err(TokenConfigError::KeyMismatch {
				algorithm,
				expected: "a shared secret",
			})
		}
	};
	key.map_err(TokenConfigError::InvalidKey)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::FixedClock;
	use crate::testing::{sign_hs256, standard_claims, TEST_SECRET};
	use serde_json::json;

	const NOW: i64 = 1_700_000_000;

	fn validator() -> TokenValidator {
		TokenValidator::new(&TokenConfig::hmac(TEST_SECRET))
			.unwrap()
			.with_clock(Arc::new(FixedClock::at_timestamp(NOW)))
	}

	#[test]
	fn valid_token_verifies() {
		let token = sign_hs256(&standard_claims("test", NOW), TEST_SECRET);
		let claims = validator().verify(&token).unwrap();
		assert_eq!(claims.identity, "test");
	}

	#[test]
	fn token_signed_with_other_secret_fails() {
		let token = sign_hs256(&standard_claims("test", NOW), "a_different_secret");
		assert_eq!(validator().verify(&token), Err(TokenError::BadSignature));
	}

	#[test]
	fn garbage_is_malformed() {
		for token in ["", "not-a-jwt", "a.b.c", "a.b"] {
			assert!(
				matches!(validator().verify(token), Err(TokenError::Malformed(_))),
				"{token:?} should be malformed"
			);
		}
	}

	#[test]
	fn expired_token_fails() {
		let token = sign_hs256(&standard_claims("test", NOW - 2 * 86_400), TEST_SECRET);
		assert_eq!(validator().verify(&token), Err(TokenError::Expired));
	}

	#[test]
	fn future_token_fails() {
		let token = sign_hs256(&standard_claims("test", NOW + 3_600), TEST_SECRET);
		assert_eq!(validator().verify(&token), Err(TokenError::NotYetValid));
	}

	#[test]
	fn skip_expiry_still_verifies_signature() {
		let expired = sign_hs256(&standard_claims("test", NOW - 2 * 86_400), TEST_SECRET);
		let claims = validator().verify_with(&expired, ExpiryCheck::Skip).unwrap();
		assert_eq!(claims.identity, "test");

		let forged = sign_hs256(&standard_claims("test", NOW - 2 * 86_400), "other");
		assert_eq!(
			validator().verify_with(&forged, ExpiryCheck::Skip),
			Err(TokenError::BadSignature)
		);
	}

	#[test]
	fn missing_identity_fails() {
		let token = sign_hs256(
			&json!({"sub": "user", "nbf": NOW, "exp": NOW + 60}),
			TEST_SECRET,
		);
		assert_eq!(
			validator().verify(&token),
			Err(TokenError::MissingIdentity {
				claim: "username".to_string()
			})
		);
	}

	#[test]
	fn identity_claim_is_configurable() {
		let validator = TokenValidator::new(&TokenConfig::hmac(TEST_SECRET).with_identity_claim("sub"))
			.unwrap()
			.with_clock(Arc::new(FixedClock::at_timestamp(NOW)));
		let token = sign_hs256(&standard_claims("test", NOW), TEST_SECRET);
		assert_eq!(validator.verify(&token).unwrap().identity, "user");
	}

	#[test]
	fn audience_is_not_enforced_unless_configured() {
		let token = sign_hs256(
			&json!({"username": "test", "aud": "somebody-else"}),
			TEST_SECRET,
		);
		assert!(validator().verify(&token).is_ok());
	}

	#[test]
	fn configured_issuer_and_audience_are_enforced() {
		let config = TokenConfig {
			issuer: Some("jwt-test".to_string()),
			audience: Some("jwt-test".to_string()),
			..TokenConfig::hmac(TEST_SECRET)
		};
		let validator = TokenValidator::new(&config)
			.unwrap()
			.with_clock(Arc::new(FixedClock::at_timestamp(NOW)));

		let good = sign_hs256(&standard_claims("test", NOW), TEST_SECRET);
		assert!(validator.verify(&good).is_ok());

		let wrong_issuer = sign_hs256(
			&json!({"username": "test", "iss": "elsewhere", "aud": "jwt-test"}),
			TEST_SECRET,
		);
		assert_eq!(validator.verify(&wrong_issuer), Err(TokenError::InvalidIssuer));

		let wrong_audience = sign_hs256(
			&json!({"username": "test", "iss": "jwt-test", "aud": "elsewhere"}),
			TEST_SECRET,
		);
		assert_eq!(
			validator.verify(&wrong_audience),
			Err(TokenError::InvalidAudience)
		);
	}

	#[test]
	fn verification_is_idempotent() {
		let token = sign_hs256(&standard_claims("test", NOW), TEST_SECRET);
		let v = validator();
		assert_eq!(v.verify(&token), v.verify(&token));
	}

	mod construction {
		use super::*;

		#[test]
		fn missing_key_is_rejected() {
			let err = TokenValidator::new(&TokenConfig::default()).unwrap_err();
			assert!(matches!(err, TokenConfigError::MissingKey { .. }));
		}

		#[test]
		fn empty_secret_is_rejected() {
			let err = TokenValidator::new(&TokenConfig::hmac("")).unwrap_err();
			assert!(matches!(err, TokenConfigError::MissingKey { .. }));
		}

		#[test]
		fn secret_with_asymmetric_algorithm_is_rejected() {
			let config = TokenConfig {
				algorithm: Algorithm::RS256,
				..TokenConfig::hmac(TEST_SECRET)
			};
			let err = TokenValidator::new(&config).unwrap_err();
			assert!(matches!(err, TokenConfigError::KeyMismatch { .. }));
		}

		#[test]
		fn unreadable_key_file_is_rejected() {
			let config = TokenConfig {
				algorithm: Algorithm::RS256,
				key: Some(KeySource::PublicKeyFile("/nonexistent/key.pem".into())),
				..Default::default()
			};
			let err = TokenValidator::new(&config).unwrap_err();
			assert!(matches!(err, TokenConfigError::KeyFile { .. }));
		}

		#[test]
		fn empty_identity_claim_is_rejected() {
			let err =
				TokenValidator::new(&TokenConfig::hmac(TEST_SECRET).with_identity_claim("")).unwrap_err();
			assert!(matches!(err, TokenConfigError::EmptyIdentityClaim));
		}
	}

	#[test]
	fn rs256_token_verifies_with_public_key_file() {
		use jsonwebtoken::{encode, EncodingKey, Header};
		use rsa::{pkcs1::EncodeRsaPublicKey, pkcs8::EncodePrivateKey, RsaPrivateKey};
		use std::io::Write;

		let mut rng = rand::thread_rng();
		let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA key");
		let private_pem = private_key
			.to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
			.expect("Failed to convert private key to PEM");
		let public_pem = private_key
			.to_public_key()
			.to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
			.expect("Failed to convert public key to PEM");

		let mut key_file = tempfile::NamedTempFile::new().unwrap();
		key_file.write_all(public_pem.as_bytes()).unwrap();

		let config = TokenConfig {
			algorithm: Algorithm::RS256,
			key: Some(KeySource::PublicKeyFile(key_file.path().to_path_buf())),
			..Default::default()
		};
		let validator = TokenValidator::new(&config)
			.unwrap()
			.with_clock(Arc::new(FixedClock::at_timestamp(NOW)));

		let token = encode(
			&Header::new(Algorithm::RS256),
			&standard_claims("test", NOW),
			&EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap(),
		)
		.unwrap();
		assert_eq!(validator.verify(&token).unwrap().identity, "test");

		let hmac_token = sign_hs256(&standard_claims("test", NOW), TEST_SECRET);
		assert_eq!(validator.verify(&hmac_token), Err(TokenError::BadSignature));
	}
}
