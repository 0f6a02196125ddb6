// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use jsonwebtoken::errors::ErrorKind;

/// Why a presented token was rejected.
///
/// These are credential faults: an expected outcome for a bad or stale
/// token, never a system failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
	#[error("malformed token: {0}")]
	Malformed(String),

	#[error("token signature verification failed")]
	BadSignature,

	#[error("token expired")]
	Expired,

	#[error("token not yet valid")]
	NotYetValid,

	#[error("token has no usable '{claim}' claim")]
	MissingIdentity { claim: String },

	#[error("token issuer not accepted")]
	InvalidIssuer,

	#[error("token audience not accepted")]
	InvalidAudience,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
	fn from(err: jsonwebtoken::errors::Error) -> Self {
		match err.kind() {
			ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
			ErrorKind::ExpiredSignature => TokenError::Expired,
			ErrorKind::ImmatureSignature => TokenError::NotYetValid,
			ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
			ErrorKind::InvalidAudience => TokenError::InvalidAudience,
			ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => TokenError::InvalidIssuer,
			ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => TokenError::InvalidAudience,
			_ => TokenError::Malformed(err.to_string()),
		}
	}
}

/// Key material or verification settings that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum TokenConfigError {
	#[error("no key material configured for {algorithm:?}")]
	MissingKey { algorithm: jsonwebtoken::Algorithm },

	#[error("{algorithm:?} requires {expected} key material")]
	KeyMismatch {
		algorithm: jsonwebtoken::Algorithm,
		expected: &'static str,
	},

	#[error("failed to read public key at {path}: {source}")]
	KeyFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid public key: {0}")]
	InvalidKey(#[source] jsonwebtoken::errors::Error),

	#[error("identity claim name must not be empty")]
	EmptyIdentityClaim,
}
