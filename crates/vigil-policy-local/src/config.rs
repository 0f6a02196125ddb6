// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local store configuration (runtime, fully resolved).

use std::time::Duration;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Operator-supplied query templates.
///
/// Each template binds the identity as its first parameter. The ACL template
/// also binds the requested access level as its second parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplates {
	/// Returns a count; the identity exists when it is positive.
	pub user_query: String,
	/// Returns a count; the identity is privileged when it is positive.
	/// Absent means nobody is privileged.
	pub superuser_query: Option<String>,
	/// Returns one row per topic filter granted at the requested level.
	pub acl_query: String,
}

#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
	pub database_url: String,
	pub max_connections: u32,
	pub query_timeout: Duration,
	pub queries: QueryTemplates,
	/// Ignore the token's validity window for user and privilege checks.
	pub skip_user_expiration: bool,
	/// Ignore the token's validity window for access checks.
	pub skip_acl_expiration: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocalConfigError {
	#[error("local backend requires a database URL")]
	MissingDatabaseUrl,

	#[error("local backend requires a {0}")]
	MissingQuery(&'static str),

	#[error("max connections must be at least 1")]
	InvalidPoolSize,

	#[error("query timeout must be greater than zero")]
	InvalidTimeout,
}

impl LocalStoreConfig {
	pub fn new(database_url: impl Into<String>, queries: QueryTemplates) -> Self {
		Self {
			database_url: database_url.into(),
			max_connections: DEFAULT_MAX_CONNECTIONS,
			query_timeout: DEFAULT_QUERY_TIMEOUT,
			queries,
			skip_user_expiration: false,
			skip_acl_expiration: false,
		}
	}

	pub fn validate(&self) -> Result<(), LocalConfigError> {
		if self.database_url.trim().is_empty() {
			return Err(LocalConfigError::MissingDatabaseUrl);
		}
		if self.queries.user_query.trim().is_empty() {
			return Err(LocalConfigError::MissingQuery("user query"));
		}
		if self.queries.acl_query.trim().is_empty() {
			return Err(LocalConfigError::MissingQuery("acl query"));
		}
		if self.max_connections == 0 {
			return Err(LocalConfigError::InvalidPoolSize);
		}
		if self.query_timeout.is_zero() {
			return Err(LocalConfigError::InvalidTimeout);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn queries() -> QueryTemplates {
		QueryTemplates {
			user_query: "SELECT count(*) FROM users WHERE username = $1".to_string(),
			superuser_query: None,
			acl_query: "SELECT topic FROM acls WHERE username = $1 AND rw >= $2".to_string(),
		}
	}

	#[test]
	fn test_defaults() {
		let config = LocalStoreConfig::new("sqlite::memory:", queries());
		assert_eq!(config.max_connections, 10);
		assert_eq!(config.query_timeout, Duration::from_secs(5));
		assert!(!config.skip_user_expiration);
		assert!(!config.skip_acl_expiration);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_superuser_query_is_optional() {
		let config = LocalStoreConfig::new("sqlite::memory:", queries());
		assert!(config.queries.superuser_query.is_none());
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_missing_user_query() {
		let mut q = queries();
		q.user_query = "  ".to_string();
		let config = LocalStoreConfig::new("sqlite::memory:", q);
		assert_eq!(
			config.validate(),
			Err(LocalConfigError::MissingQuery("user query"))
		);
	}

	#[test]
	fn test_missing_acl_query() {
		let mut q = queries();
		q.acl_query = String::new();
		let config = LocalStoreConfig::new("sqlite::memory:", q);
		assert_eq!(
			config.validate(),
			Err(LocalConfigError::MissingQuery("acl query"))
		);
	}

	#[test]
	fn test_missing_database_url() {
		let config = LocalStoreConfig::new("", queries());
		assert_eq!(config.validate(), Err(LocalConfigError::MissingDatabaseUrl));
	}

	#[test]
	fn test_zero_pool_size() {
		let mut config = LocalStoreConfig::new("sqlite::memory:", queries());
		config.max_connections = 0;
		assert_eq!(config.validate(), Err(LocalConfigError::InvalidPoolSize));
	}

	#[test]
	fn test_zero_timeout() {
		let mut config = LocalStoreConfig::new("sqlite::memory:", queries());
		config.query_timeout = Duration::ZERO;
		assert_eq!(config.validate(), Err(LocalConfigError::InvalidTimeout));
	}
}
