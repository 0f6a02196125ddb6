// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Remote service configuration (runtime, fully resolved).

use std::time::Duration;

use url::Url;

use crate::codec::{ParamsMode, ResponseMode};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct RemoteServiceConfig {
	/// Host name or address, optionally with `:port` when `port` is unset.
	pub host: String,
	pub port: Option<u16>,
	pub with_tls: bool,
	/// Verify the server certificate when `with_tls` is set.
	pub verify_peer: bool,
	pub getuser_uri: String,
	pub superuser_uri: String,
	pub aclcheck_uri: String,
	pub params_mode: ParamsMode,
	pub response_mode: ResponseMode,
	pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteConfigError {
	#[error("remote backend requires a host")]
	MissingHost,

	#[error("remote backend requires a {0}")]
	MissingUri(&'static str),

	#[error("invalid endpoint URL {url}: {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("request timeout must be greater than zero")]
	InvalidTimeout,

	#[error("failed to build HTTP client: {0}")]
	Client(#[source] reqwest::Error),
}

/// Resolved URLs for the three operations.
#[derive(Debug, Clone)]
pub struct Endpoints {
	pub user: Url,
	pub superuser: Url,
	pub acl: Url,
}

impl RemoteServiceConfig {
	pub fn new(host: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			port: None,
			with_tls: false,
			verify_peer: true,
			getuser_uri: String::new(),
			superuser_uri: String::new(),
			aclcheck_uri: String::new(),
			params_mode: ParamsMode::default(),
			response_mode: ResponseMode::default(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn with_uris(
		mut self,
		getuser: impl Into<String>,
		superuser: impl Into<String>,
		aclcheck: impl Into<String>,
	) -> Self {
		self.getuser_uri = getuser.into();
		self.superuser_uri = superuser.into();
		self.aclcheck_uri = aclcheck.into();
		self
	}

	pub fn with_modes(mut self, params: ParamsMode, response: ResponseMode) -> Self {
		self.params_mode = params;
		self.response_mode = response;
		self
	}

	/// `scheme://host[:port]`
	pub fn base_url(&self) -> String {
		let scheme = if self.with_tls { "https" } else { "http" };
		match self.port {
			Some(port) => format!("{scheme}://{}:{port}", self.host),
			None => format!("{scheme}://{}", self.host),
		}
	}

	pub fn validate(&self) -> Result<(), RemoteConfigError> {
		if self.host.trim().is_empty() {
			return Err(RemoteConfigError::MissingHost);
		}
		for (name, uri) in [
			("getuser URI", &self.getuser_uri),
			("superuser URI", &self.superuser_uri),
			("aclcheck URI", &self.aclcheck_uri),
		] {
			if uri.trim().is_empty() {
				return Err(RemoteConfigError::MissingUri(name));
			}
		}
		if self.timeout.is_zero() {
			return Err(RemoteConfigError::InvalidTimeout);
		}
		Ok(())
	}

	/// Validate and resolve all three endpoint URLs.
	pub fn endpoints(&self) -> Result<Endpoints, RemoteConfigError> {
		self.validate()?;
		Ok(Endpoints {
			user: self.endpoint(&self.getuser_uri)?,
			superuser: self.endpoint(&self.superuser_uri)?,
			acl: self.endpoint(&self.aclcheck_uri)?,
		})
	}

	fn endpoint(&self, uri: &str) -> Result<Url, RemoteConfigError> {
		let uri = uri.trim();
		let url = if uri.starts_with('/') {
			format!("{}{uri}", self.base_url())
		} else {
			format!("{}/{uri}", self.base_url())
		};
		Url::parse(&url).map_err(|source| RemoteConfigError::InvalidUrl { url, source })
	}
}
