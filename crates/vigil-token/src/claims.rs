// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Verified token claims.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Claims of a token whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
	/// Value of the configured identity claim; never empty.
	pub identity: String,
	pub subject: Option<String>,
	pub issuer: Option<String>,
	pub audience: Vec<String>,
	pub issued_at: Option<DateTime<Utc>>,
	pub not_before: Option<DateTime<Utc>>,
	pub expires_at: Option<DateTime<Utc>>,
}

impl Claims {
	/// Build claims from a decoded payload, extracting `identity_claim`.
	pub(crate) fn from_payload(
		payload: Map<String, Value>,
		identity_claim: &str,
	) -> Result<Self, TokenError> {
		let identity = payload
			.get(identity_claim)
			.and_then(Value::as_str)
			.filter(|s| !s.is_empty())
			.ok_or_else(|| TokenError::MissingIdentity {
				claim: identity_claim.to_string(),
			})?
			.to_string();

		Ok(Self {
			identity,
			subject: string_claim(&payload, "sub")?,
			issuer: string_claim(&payload, "iss")?,
			audience: audience_claim(&payload)?,
			issued_at: time_claim(&payload, "iat")?,
			not_before: time_claim(&payload, "nbf")?,
			expires_at: time_claim(&payload, "exp")?,
		})
	}

	/// Check the validity window against `now`, tolerating `leeway_secs` of skew.
	///
	/// A token is valid when `not_before <= now <= expires_at`. Missing bounds
	/// are open.
	pub fn check_window(&self, now: DateTime<Utc>, leeway_secs: u64) -> Result<(), TokenError> {
		let now = now.timestamp();
		let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);

		if let Some(nbf) = self.not_before {
			if now.saturating_add(leeway) < nbf.timestamp() {
				return Err(TokenError::NotYetValid);
			}
		}

		if let Some(exp) = self.expires_at {
			if now.saturating_sub(leeway) > exp.timestamp() {
				return Err(TokenError::Expired);
			}
		}

		Ok(())
	}
}

fn string_claim(payload: &Map<String, Value>, name: &str) -> Result<Option<String>, TokenError> {
	match payload.get(name) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s.clone())),
		Some(_) => Err(TokenError::Malformed(format!("'{name}' claim is not a string"))),
	}
}

fn audience_claim(payload: &Map<String, Value>) -> Result<Vec<String>, TokenError> {
	match payload.get("aud") {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(Value::String(s)) => Ok(vec![s.clone()]),
		Some(Value::Array(items)) => items
			.iter()
			.map(|item| {
				item
					.as_str()
					.map(str::to_string)
					.ok_or_else(|| TokenError::Malformed("'aud' claim has a non-string entry".to_string()))
			})
			.collect(),
		Some(_) => Err(TokenError::Malformed("'aud' claim is not a string or array".to_string())),
	}
}

fn time_claim(payload: &Map<String, Value>, name: &str) -> Result<Option<DateTime<Utc>>, TokenError> {
	let secs = match payload.get(name) {
		None | Some(Value::Null) => return Ok(None),
		Some(Value::Number(n)) => n
			.as_i64()
			.or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
		Some(_) => None,
	};

	secs
		.and_then(|s| DateTime::from_timestamp(s, 0))
		.map(Some)
		.ok_or_else(|| TokenError::Malformed(format!("'{name}' claim is not a valid timestamp")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn payload(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => unreachable!("test payloads are objects"),
		}
	}

	#[test]
	fn extracts_identity_and_window() {
		let claims = Claims::from_payload(
			payload(json!({
				"iss": "jwt-test",
				"aud": "jwt-test",
				"nbf": 1_700_000_000,
				"exp": 1_700_086_400,
				"sub": "user",
				"username": "test",
			})),
			"username",
		)
		.unwrap();

		assert_eq!(claims.identity, "test");
		assert_eq!(claims.subject.as_deref(), Some("user"));
		assert_eq!(claims.issuer.as_deref(), Some("jwt-test"));
		assert_eq!(claims.audience, vec!["jwt-test".to_string()]);
		assert_eq!(claims.not_before.unwrap().timestamp(), 1_700_000_000);
		assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_086_400);
		assert!(claims.issued_at.is_none());
	}

	#[test]
	fn identity_can_come_from_sub() {
		let claims = Claims::from_payload(payload(json!({"sub": "user"})), "sub").unwrap();
		assert_eq!(claims.identity, "user");
	}

	#[test]
	fn missing_or_empty_identity_is_rejected() {
		for value in [json!({}), json!({"username": ""}), json!({"username": 42})] {
			let err = Claims::from_payload(payload(value), "username").unwrap_err();
			assert_eq!(
				err,
				TokenError::MissingIdentity {
					claim: "username".to_string()
				}
			);
		}
	}

	#[test]
	fn audience_accepts_arrays() {
		let claims =
			Claims::from_payload(payload(json!({"username": "u", "aud": ["a", "b"]})), "username")
				.unwrap();
		assert_eq!(claims.audience, vec!["a".to_string(), "b".to_string()]);
	}

	#[test]
	fn non_numeric_exp_is_malformed() {
		let err = Claims::from_payload(payload(json!({"username": "u", "exp": "soon"})), "username")
			.unwrap_err();
		assert!(matches!(err, TokenError::Malformed(_)));
	}

	mod window {
		use super::*;

		fn claims(nbf: Option<i64>, exp: Option<i64>) -> Claims {
			Claims {
				identity: "test".to_string(),
				subject: None,
				issuer: None,
				audience: Vec::new(),
				issued_at: None,
				not_before: nbf.and_then(|s| DateTime::from_timestamp(s, 0)),
				expires_at: exp.and_then(|s| DateTime::from_timestamp(s, 0)),
			}
		}

		fn at(secs: i64) -> DateTime<Utc> {
			DateTime::from_timestamp(secs, 0).unwrap()
		}

		#[test]
		fn bounds_are_inclusive() {
			let c = claims(Some(100), Some(200));
			assert!(c.check_window(at(100), 0).is_ok());
			assert!(c.check_window(at(200), 0).is_ok());
			assert_eq!(c.check_window(at(99), 0), Err(TokenError::NotYetValid));
			assert_eq!(c.check_window(at(201), 0), Err(TokenError::Expired));
		}

		#[test]
		fn leeway_widens_both_ends() {
			let c = claims(Some(100), Some(200));
			assert!(c.check_window(at(95), 5).is_ok());
			assert!(c.check_window(at(205), 5).is_ok());
			assert_eq!(c.check_window(at(206), 5), Err(TokenError::Expired));
		}

		#[test]
		fn missing_bounds_are_open() {
			let c = claims(None, None);
			assert!(c.check_window(at(0), 0).is_ok());
			assert!(c.check_window(at(i32::MAX as i64), 0).is_ok());
		}
	}
}
