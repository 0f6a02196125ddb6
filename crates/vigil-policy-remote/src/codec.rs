// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire encodings for the remote policy service.
//!
//! Requests carry their parameters as either a JSON object or a URL-encoded
//! form. Identity and privilege requests have no parameters; the token
//! travels only in the `authorization` header. ACL requests carry `topic`,
//! `clientid` and `acc`.
//!
//! Verdicts are read in one of three ways:
//!
//! | Mode     | Allow when                                   | Fault when              |
//! |----------|----------------------------------------------|-------------------------|
//! | `json`   | body decodes with `ok: true` (status ignored)| body does not decode    |
//! | `status` | status is exactly 200 (body ignored)         | never                   |
//! | `text`   | status is 200 and body is exactly `ok`       | never                   |

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use vigil_acl::AccessLevel;

use crate::error::RemoteError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Literal body that grants in [`ResponseMode::Text`].
pub const TEXT_ALLOW: &[u8] = b"ok";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamsMode {
	#[default]
	Json,
	Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
	#[default]
	Json,
	Status,
	Text,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} mode: {value:?}")]
pub struct UnknownMode {
	pub kind: &'static str,
	pub value: String,
}

impl FromStr for ParamsMode {
	type Err = UnknownMode;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(ParamsMode::Json),
			"form" => Ok(ParamsMode::Form),
			_ => Err(UnknownMode {
				kind: "params",
				value: s.to_string(),
			}),
		}
	}
}

impl FromStr for ResponseMode {
	type Err = UnknownMode;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(ResponseMode::Json),
			"status" => Ok(ResponseMode::Status),
			"text" => Ok(ResponseMode::Text),
			_ => Err(UnknownMode {
				kind: "response",
				value: s.to_string(),
			}),
		}
	}
}

impl fmt::Display for ParamsMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ParamsMode::Json => "json",
			ParamsMode::Form => "form",
		})
	}
}

impl fmt::Display for ResponseMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ResponseMode::Json => "json",
			ResponseMode::Status => "status",
			ResponseMode::Text => "text",
		})
	}
}

/// Parameters of one outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPayload<'a> {
	/// Identity and privilege checks.
	Empty,
	Acl {
		topic: &'a str,
		client_id: &'a str,
		acc: AccessLevel,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
	pub content_type: &'static str,
	pub body: Vec<u8>,
}

pub fn encode_request(mode: ParamsMode, payload: &RequestPayload<'_>) -> EncodedRequest {
	match mode {
		ParamsMode::Json => {
			let value = match *payload {
				RequestPayload::Empty => json!({}),
				RequestPayload::Acl {
					topic,
					client_id,
					acc,
				} => json!({
					"topic": topic,
					"clientid": client_id,
					"acc": acc.value(),
				}),
			};
			EncodedRequest {
				content_type: JSON_CONTENT_TYPE,
				body: value.to_string().into_bytes(),
			}
		}
		ParamsMode::Form => {
			let mut form = url::form_urlencoded::Serializer::new(String::new());
			if let RequestPayload::Acl {
				topic,
				client_id,
				acc,
			} = *payload
			{
				form.append_pair("topic", topic);
				form.append_pair("clientid", client_id);
				form.append_pair("acc", &acc.value().to_string());
			}
			EncodedRequest {
				content_type: FORM_CONTENT_TYPE,
				body: form.finish().into_bytes(),
			}
		}
	}
}

#[derive(Debug, Deserialize)]
struct JsonVerdict {
	#[serde(alias = "Ok")]
	ok: bool,
	#[serde(default, alias = "Error")]
	error: Option<String>,
}

/// Turn a response into a verdict. Only [`ResponseMode::Json`] can fault.
pub fn decode_response(mode: ResponseMode, status: u16, body: &[u8]) -> Result<bool, RemoteError> {
	match mode {
		ResponseMode::Json => {
			let verdict: JsonVerdict = serde_json::from_slice(body).map_err(|e| {
				RemoteError::MalformedResponse(format!("status {status}, undecodable body: {e}"))
			})?;
			if let Some(error) = verdict.error.as_deref().filter(|e| !e.is_empty()) {
				debug!(error, "remote service reported");
			}
			Ok(verdict.ok)
		}
		ResponseMode::Status => Ok(status == 200),
		ResponseMode::Text => Ok(status == 200 && body == TEXT_ALLOW),
	}
}
