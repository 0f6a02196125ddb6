// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy decisions delegated to a remote HTTP authority.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;
use vigil_acl::AccessLevel;
use vigil_policy_core::{PolicyBackend, PolicyError};
use vigil_token::TokenValidator;

use crate::codec::{decode_response, encode_request, ParamsMode, RequestPayload, ResponseMode};
use crate::config::{Endpoints, RemoteConfigError, RemoteServiceConfig};
use crate::error::RemoteError;

/// Forwards policy questions to a remote authorization service.
///
/// With a [`TokenValidator`] attached, tokens are verified locally first and
/// invalid ones are denied without a round trip. Without one the raw token
/// is forwarded and the remote side decides.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct RemotePolicyService {
	client: Client,
	endpoints: Arc<Endpoints>,
	params_mode: ParamsMode,
	response_mode: ResponseMode,
	timeout: Duration,
	validator: Option<TokenValidator>,
	closed: Arc<AtomicBool>,
}

impl RemotePolicyService {
	pub fn new(
		config: &RemoteServiceConfig,
		validator: Option<TokenValidator>,
	) -> Result<Self, RemoteConfigError> {
		let endpoints = config.endpoints()?;

		let mut builder = vigil_common_http::builder_with_timeout(config.timeout);
		if config.with_tls && !config.verify_peer {
			builder = builder.danger_accept_invalid_certs(true);
		}
		let client = builder.build().map_err(RemoteConfigError::Client)?;

		debug!(
			base_url = %config.base_url(),
			params_mode = %config.params_mode,
			response_mode = %config.response_mode,
			local_verification = validator.is_some(),
			"remote policy service configured"
		);

		Ok(Self {
			client,
			endpoints: Arc::new(endpoints),
			params_mode: config.params_mode,
			response_mode: config.response_mode,
			timeout: config.timeout,
			validator,
			closed: Arc::new(AtomicBool::new(false)),
		})
	}

	#[instrument(skip(self, token), name = "RemotePolicyService::authenticate")]
	pub async fn authenticate(&self, token: &str) -> Result<bool, RemoteError> {
		self.ask(
			"getuser request",
			&self.endpoints.user,
			token,
			RequestPayload::Empty,
		)
		.await
	}

	#[instrument(skip(self, token), name = "RemotePolicyService::is_privileged")]
	pub async fn is_privileged(&self, token: &str) -> Result<bool, RemoteError> {
		self.ask(
			"superuser request",
			&self.endpoints.superuser,
			token,
			RequestPayload::Empty,
		)
		.await
	}

	#[instrument(skip(self, token), name = "RemotePolicyService::check_access")]
	pub async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, RemoteError> {
		self.ask(
			"aclcheck request",
			&self.endpoints.acl,
			token,
			RequestPayload::Acl {
				topic,
				client_id,
				acc: requested,
			},
		)
		.await
	}

	/// Refuse further requests. In-flight requests run to completion.
	pub fn close(&self) {
		self.closed.store(true, Ordering::SeqCst);
		debug!("remote policy service closed");
	}

	async fn ask(
		&self,
		operation: &'static str,
		url: &Url,
		token: &str,
		payload: RequestPayload<'_>,
	) -> Result<bool, RemoteError> {
		if self.closed.load(Ordering::SeqCst) {
			return Err(RemoteError::Closed);
		}

		if let Some(validator) = &self.validator {
			if let Err(e) = validator.verify(token) {
				debug!(error = %e, "token rejected before delegation");
				return Ok(false);
			}
		}

		let Ok(mut credential) = HeaderValue::from_str(token) else {
			debug!("token is not a valid header value");
			return Ok(false);
		};
		credential.set_sensitive(true);

		let encoded = encode_request(self.params_mode, &payload);
		let response = self
			.client
			.post(url.clone())
			.header(AUTHORIZATION, credential)
			.header(CONTENT_TYPE, encoded.content_type)
			.body(encoded.body)
			.send()
			.await
			.map_err(|e| self.transport_error(operation, e))?;

		let status = response.status().as_u16();
		let body = match self.response_mode {
			ResponseMode::Status => Vec::new(),
			ResponseMode::Json | ResponseMode::Text => response
				.bytes()
				.await
				.map_err(|e| self.transport_error(operation, e))?
				.to_vec(),
		};

		let allowed = decode_response(self.response_mode, status, &body)?;
		debug!(operation, status, allowed, "remote decision");
		Ok(allowed)
	}

	fn transport_error(&self, operation: &'static str, err: reqwest::Error) -> RemoteError {
		if err.is_timeout() {
			RemoteError::Timeout {
				operation,
				timeout: self.timeout,
			}
		} else {
			RemoteError::Http(err)
		}
	}
}

#[async_trait]
impl PolicyBackend for RemotePolicyService {
	fn name(&self) -> &'static str {
		"remote"
	}

	async fn authenticate(&self, token: &str) -> Result<bool, PolicyError> {
		Ok(RemotePolicyService::authenticate(self, token).await?)
	}

	async fn is_privileged(&self, token: &str) -> Result<bool, PolicyError> {
		Ok(RemotePolicyService::is_privileged(self, token).await?)
	}

	async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, PolicyError> {
		Ok(RemotePolicyService::check_access(self, token, topic, client_id, requested).await?)
	}

	async fn close(&self) {
		RemotePolicyService::close(self)
	}
}
