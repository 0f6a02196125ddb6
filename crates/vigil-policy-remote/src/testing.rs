// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A mock remote authority for tests across the workspace.
//!
//! Grants identity and privilege requests that carry the expected token, and
//! ACL requests whose token, topic and client id match exactly and whose
//! `acc` does not exceed the granted level. Parameters are decoded with the
//! configured params mode; verdicts are written with the configured response
//! mode.

use serde_json::{json, Value};
use vigil_acl::AccessLevel;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::codec::{ParamsMode, ResponseMode};
use crate::config::RemoteServiceConfig;

pub const USER_URI: &str = "/user";
pub const SUPERUSER_URI: &str = "/superuser";
pub const ACL_URI: &str = "/acl";

#[derive(Debug, Clone)]
pub struct MockAuthority {
	pub token: String,
	pub superuser: bool,
	pub topic: String,
	pub client_id: String,
	pub granted: AccessLevel,
	pub params_mode: ParamsMode,
	pub response_mode: ResponseMode,
}

struct AclParams {
	topic: String,
	client_id: String,
	acc: i64,
}

impl MockAuthority {
	pub fn new(token: impl Into<String>, params_mode: ParamsMode, response_mode: ResponseMode) -> Self {
		Self {
			token: token.into(),
			superuser: true,
			topic: "test/topic".to_string(),
			client_id: "test_client".to_string(),
			granted: AccessLevel::READ,
			params_mode,
			response_mode,
		}
	}

	/// Start a server answering every POST with this authority.
	pub async fn start(self) -> MockServer {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(self)
			.mount(&server)
			.await;
		server
	}

	fn decide(&self, request: &Request) -> Option<bool> {
		let token_ok = request
			.headers
			.get("authorization")
			.and_then(|v| v.to_str().ok())
			.is_some_and(|v| v == self.token);

		match request.url.path() {
			USER_URI => Some(token_ok),
			SUPERUSER_URI => Some(token_ok && self.superuser),
			ACL_URI => {
				let params = self.acl_params(&request.body)?;
				Some(
					token_ok
						&& params.topic == self.topic
						&& params.client_id == self.client_id
						&& params.acc <= self.granted.value(),
				)
			}
			_ => Some(false),
		}
	}

	fn acl_params(&self, body: &[u8]) -> Option<AclParams> {
		match self.params_mode {
			ParamsMode::Json => {
				let value: Value = serde_json::from_slice(body).ok()?;
				Some(AclParams {
					topic: value.get("topic")?.as_str()?.to_string(),
					client_id: value.get("clientid")?.as_str()?.to_string(),
					acc: value.get("acc")?.as_i64()?,
				})
			}
			ParamsMode::Form => {
				let mut topic = None;
				let mut client_id = None;
				let mut acc = None;
				for (key, value) in url::form_urlencoded::parse(body) {
					match key.as_ref() {
						"topic" => topic = Some(value.into_owned()),
						"clientid" => client_id = Some(value.into_owned()),
						"acc" => acc = value.parse().ok(),
						_ => {}
					}
				}
				Some(AclParams {
					topic: topic?,
					client_id: client_id?,
					acc: acc?,
				})
			}
		}
	}
}

impl Respond for MockAuthority {
	fn respond(&self, request: &Request) -> ResponseTemplate {
		let Some(allowed) = self.decide(request) else {
			return ResponseTemplate::new(400);
		};

		match self.response_mode {
			ResponseMode::Json => {
				let error = if allowed { "" } else { "Acl check failed." };
				ResponseTemplate::new(200).set_body_json(json!({"ok": allowed, "error": error}))
			}
			ResponseMode::Status => ResponseTemplate::new(if allowed { 200 } else { 404 }),
			ResponseMode::Text => {
				ResponseTemplate::new(200).set_body_string(if allowed { "ok" } else { "Acl check failed." })
			}
		}
	}
}

/// Configuration pointing at `server` with the standard URIs.
pub fn config_for(
	server: &MockServer,
	params_mode: ParamsMode,
	response_mode: ResponseMode,
) -> RemoteServiceConfig {
	let mut config = RemoteServiceConfig::new(server.address().ip().to_string())
		.with_uris(USER_URI, SUPERUSER_URI, ACL_URI)
		.with_modes(params_mode, response_mode);
	config.port = Some(server.address().port());
	config
}

pub const ALL_MODES: [(ParamsMode, ResponseMode); 6] = [
	(ParamsMode::Json, ResponseMode::Json),
	(ParamsMode::Json, ResponseMode::Status),
	(ParamsMode::Json, ResponseMode::Text),
	(ParamsMode::Form, ResponseMode::Json),
	(ParamsMode::Form, ResponseMode::Status),
	(ParamsMode::Form, ResponseMode::Text),
];
