// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local (SQL) backend configuration.

use std::time::Duration;

use serde::Deserialize;
use vigil_policy_local::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_QUERY_TIMEOUT};
use vigil_policy_local::{LocalConfigError, LocalStoreConfig, QueryTemplates};

use crate::error::ConfigError;

/// Local backend configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalConfigLayer {
	#[serde(default)]
	pub database_url: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
	#[serde(default)]
	pub query_timeout_secs: Option<u64>,
	#[serde(default)]
	pub user_query: Option<String>,
	#[serde(default)]
	pub superuser_query: Option<String>,
	#[serde(default)]
	pub acl_query: Option<String>,
	#[serde(default)]
	pub skip_user_expiration: Option<bool>,
	#[serde(default)]
	pub skip_acl_expiration: Option<bool>,
}

impl LocalConfigLayer {
	pub fn merge(&mut self, other: LocalConfigLayer) {
		if other.database_url.is_some() {
			self.database_url = other.database_url;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
		if other.query_timeout_secs.is_some() {
			self.query_timeout_secs = other.query_timeout_secs;
		}
		if other.user_query.is_some() {
			self.user_query = other.user_query;
		}
		if other.superuser_query.is_some() {
			self.superuser_query = other.superuser_query;
		}
		if other.acl_query.is_some() {
			self.acl_query = other.acl_query;
		}
		if other.skip_user_expiration.is_some() {
			self.skip_user_expiration = other.skip_user_expiration;
		}
		if other.skip_acl_expiration.is_some() {
			self.skip_acl_expiration = other.skip_acl_expiration;
		}
	}

	pub fn finalize(self) -> Result<LocalStoreConfig, ConfigError> {
		let config = LocalStoreConfig {
			database_url: self.database_url.unwrap_or_default(),
			max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
			query_timeout: self
				.query_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(DEFAULT_QUERY_TIMEOUT),
			queries: QueryTemplates {
				user_query: self.user_query.unwrap_or_default(),
				superuser_query: self.superuser_query.filter(|q| !q.trim().is_empty()),
				acl_query: self.acl_query.unwrap_or_default(),
			},
			skip_user_expiration: self.skip_user_expiration.unwrap_or(false),
			skip_acl_expiration: self.skip_acl_expiration.unwrap_or(false),
		};

		config.validate().map_err(|e| {
			let key = match e {
				LocalConfigError::MissingDatabaseUrl => "local.database_url (VIGIL_LOCAL_DATABASE_URL)",
				LocalConfigError::MissingQuery("user query") => "local.user_query (VIGIL_LOCAL_USER_QUERY)",
				LocalConfigError::MissingQuery(_) => "local.acl_query (VIGIL_LOCAL_ACL_QUERY)",
				LocalConfigError::InvalidPoolSize => {
					"local.max_connections (VIGIL_LOCAL_MAX_CONNECTIONS)"
				}
				LocalConfigError::InvalidTimeout => {
					"local.query_timeout_secs (VIGIL_LOCAL_QUERY_TIMEOUT_SECS)"
				}
			};
			ConfigError::Validation(format!("{e}: set {key}"))
		})?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn complete() -> LocalConfigLayer {
		LocalConfigLayer {
			database_url: Some("postgres://vigil@localhost/vigil".to_string()),
			user_query: Some("SELECT count(*) FROM users WHERE username = $1".to_string()),
			acl_query: Some("SELECT topic FROM acls WHERE username = $1 AND rw >= $2".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults() {
		let config = complete().finalize().unwrap();
		assert_eq!(config.max_connections, 10);
		assert_eq!(config.query_timeout, Duration::from_secs(5));
		assert!(config.queries.superuser_query.is_none());
		assert!(!config.skip_user_expiration);
		assert!(!config.skip_acl_expiration);
	}

	#[test]
	fn test_blank_superuser_query_is_absent() {
		let mut layer = complete();
		layer.superuser_query = Some("  ".to_string());
		assert!(layer.finalize().unwrap().queries.superuser_query.is_none());
	}

	#[test]
	fn test_missing_user_query_names_the_key() {
		let mut layer = complete();
		layer.user_query = None;
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("local.user_query"));
	}

	#[test]
	fn test_missing_acl_query_names_the_key() {
		let mut layer = complete();
		layer.acl_query = None;
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("VIGIL_LOCAL_ACL_QUERY"));
	}

	#[test]
	fn test_missing_database_url() {
		let mut layer = complete();
		layer.database_url = None;
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("local.database_url"));
	}

	#[test]
	fn test_merge() {
		let mut base = complete();
		base.merge(LocalConfigLayer {
			max_connections: Some(2),
			skip_acl_expiration: Some(true),
			..Default::default()
		});
		let config = base.finalize().unwrap();
		assert_eq!(config.max_connections, 2);
		assert!(config.skip_acl_expiration);
		assert!(config.database_url.starts_with("postgres://"));
	}
}
