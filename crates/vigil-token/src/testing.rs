// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token fixtures for tests across the workspace.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

/// Shared secret used by fixtures.
pub const TEST_SECRET: &str = "some_jwt_secret";

/// Claims for `identity`, valid from `now` for 24 hours.
pub fn standard_claims(identity: &str, now: i64) -> Value {
	json!({
		"iss": "jwt-test",
		"aud": "jwt-test",
		"nbf": now,
		"exp": now + 86_400,
		"sub": "user",
		"username": identity,
	})
}

/// Sign `claims` with HS256.
pub fn sign_hs256(claims: &Value, secret: &str) -> String {
	encode(
		&Header::default(),
		claims,
		&EncodingKey::from_secret(secret.as_bytes()),
	)
	.expect("HS256 signing cannot fail for JSON claims")
}
