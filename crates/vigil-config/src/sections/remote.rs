// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Remote (HTTP) backend configuration.

use std::time::Duration;

use serde::Deserialize;
use vigil_policy_remote::config::DEFAULT_TIMEOUT;
use vigil_policy_remote::{ParamsMode, RemoteConfigError, RemoteServiceConfig, ResponseMode};

use crate::error::ConfigError;

/// Remote backend configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub with_tls: Option<bool>,
	#[serde(default)]
	pub verify_peer: Option<bool>,
	#[serde(default)]
	pub getuser_uri: Option<String>,
	#[serde(default)]
	pub superuser_uri: Option<String>,
	#[serde(default)]
	pub aclcheck_uri: Option<String>,
	#[serde(default)]
	pub params_mode: Option<ParamsMode>,
	#[serde(default)]
	pub response_mode: Option<ResponseMode>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl RemoteConfigLayer {
	pub fn merge(&mut self, other: RemoteConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.with_tls.is_some() {
			self.with_tls = other.with_tls;
		}
		if other.verify_peer.is_some() {
			self.verify_peer = other.verify_peer;
		}
		if other.getuser_uri.is_some() {
			self.getuser_uri = other.getuser_uri;
		}
		if other.superuser_uri.is_some() {
			self.superuser_uri = other.superuser_uri;
		}
		if other.aclcheck_uri.is_some() {
			self.aclcheck_uri = other.aclcheck_uri;
		}
		if other.params_mode.is_some() {
			self.params_mode = other.params_mode;
		}
		if other.response_mode.is_some() {
			self.response_mode = other.response_mode;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<RemoteServiceConfig, ConfigError> {
		let config = RemoteServiceConfig {
			host: self.host.unwrap_or_default(),
			port: self.port,
			with_tls: self.with_tls.unwrap_or(false),
			verify_peer: self.verify_peer.unwrap_or(true),
			getuser_uri: self.getuser_uri.unwrap_or_default(),
			superuser_uri: self.superuser_uri.unwrap_or_default(),
			aclcheck_uri: self.aclcheck_uri.unwrap_or_default(),
			params_mode: self.params_mode.unwrap_or_default(),
			response_mode: self.response_mode.unwrap_or_default(),
			timeout: self
				.timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(DEFAULT_TIMEOUT),
		};

		config.endpoints().map_err(|e| {
			let hint = match e {
				RemoteConfigError::MissingHost => ": set remote.host (VIGIL_REMOTE_HOST)",
				RemoteConfigError::MissingUri("getuser URI") => {
					": set remote.getuser_uri (VIGIL_REMOTE_GETUSER_URI)"
				}
				RemoteConfigError::MissingUri("superuser URI") => {
					": set remote.superuser_uri (VIGIL_REMOTE_SUPERUSER_URI)"
				}
				RemoteConfigError::MissingUri(_) => {
					": set remote.aclcheck_uri (VIGIL_REMOTE_ACLCHECK_URI)"
				}
				RemoteConfigError::InvalidTimeout => {
					": set remote.timeout_secs (VIGIL_REMOTE_TIMEOUT_SECS)"
				}
				_ => "",
			};
			ConfigError::Validation(format!("{e}{hint}"))
		})?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn complete() -> RemoteConfigLayer {
		RemoteConfigLayer {
			host: Some("auth.internal".to_string()),
			getuser_uri: Some("/user".to_string()),
			superuser_uri: Some("/superuser".to_string()),
			aclcheck_uri: Some("/acl".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults() {
		let config = complete().finalize().unwrap();
		assert_eq!(config.port, None);
		assert!(!config.with_tls);
		assert!(config.verify_peer);
		assert_eq!(config.params_mode, ParamsMode::Json);
		assert_eq!(config.response_mode, ResponseMode::Json);
		assert_eq!(config.timeout, Duration::from_secs(5));
	}

	#[test]
	fn test_missing_host_names_the_key() {
		let mut layer = complete();
		layer.host = None;
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("remote.host"));
	}

	#[test]
	fn test_missing_uri_names_the_key() {
		let mut layer = complete();
		layer.aclcheck_uri = None;
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("VIGIL_REMOTE_ACLCHECK_URI"));
	}

	#[test]
	fn test_modes_from_toml() {
		let layer: RemoteConfigLayer = toml::from_str(
			r#"
			host = "auth.internal"
			params_mode = "form"
			response_mode = "text"
			"#,
		)
		.unwrap();
		assert_eq!(layer.params_mode, Some(ParamsMode::Form));
		assert_eq!(layer.response_mode, Some(ResponseMode::Text));
	}
}
