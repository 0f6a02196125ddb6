// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy decisions from a SQL database.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::AnyPool;
use sqlx::Row;
use tracing::{debug, instrument, warn};
use vigil_acl::{evaluate, expand_placeholders, AccessLevel, AclEntry, TopicFilter};
use vigil_policy_core::{PolicyBackend, PolicyError};
use vigil_token::{ExpiryCheck, TokenValidator};

use crate::config::{LocalStoreConfig, QueryTemplates};
use crate::error::StoreError;
use crate::pool::create_pool;

/// Answers policy questions by verifying tokens locally and querying a
/// database with operator-supplied templates.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct LocalPolicyStore {
	pool: AnyPool,
	validator: TokenValidator,
	queries: Arc<QueryTemplates>,
	query_timeout: Duration,
	skip_user_expiration: bool,
	skip_acl_expiration: bool,
}

impl LocalPolicyStore {
	/// Open a pool for `config.database_url` and build a store on it.
	///
	/// # Errors
	/// Returns `StoreError::Config` for an incomplete configuration, before any
	/// connection is attempted.
	pub async fn connect(
		config: &LocalStoreConfig,
		validator: TokenValidator,
	) -> Result<Self, StoreError> {
		config.validate()?;
		let pool = create_pool(config).await?;
		Self::new(pool, config, validator)
	}

	/// Build a store on an existing pool.
	pub fn new(
		pool: AnyPool,
		config: &LocalStoreConfig,
		validator: TokenValidator,
	) -> Result<Self, StoreError> {
		config.validate()?;
		Ok(Self {
			pool,
			validator,
			queries: Arc::new(config.queries.clone()),
			query_timeout: config.query_timeout,
			skip_user_expiration: config.skip_user_expiration,
			skip_acl_expiration: config.skip_acl_expiration,
		})
	}

	pub fn pool(&self) -> &AnyPool {
		&self.pool
	}

	/// True when the token is valid and its identity exists in the store.
	#[instrument(skip(self, token))]
	pub async fn authenticate(&self, token: &str) -> Result<bool, StoreError> {
		let Some(identity) = self.identity(token, self.user_expiry()) else {
			return Ok(false);
		};

		let count = self
			.count("user query", &self.queries.user_query, &identity)
			.await?;
		debug!(%identity, count, "user query finished");
		Ok(count > 0)
	}

	/// True when the token is valid and its identity is privileged.
	///
	/// Without a superuser query nobody is privileged and the store is not
	/// consulted.
	#[instrument(skip(self, token))]
	pub async fn is_privileged(&self, token: &str) -> Result<bool, StoreError> {
		let Some(sql) = self.queries.superuser_query.as_deref() else {
			return Ok(false);
		};
		let Some(identity) = self.identity(token, self.user_expiry()) else {
			return Ok(false);
		};

		let count = self.count("superuser query", sql, &identity).await?;
		debug!(%identity, count, "superuser query finished");
		Ok(count > 0)
	}

	/// True when the token is valid and some stored filter for its identity
	/// covers `topic` at `requested`.
	#[instrument(skip(self, token))]
	pub async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, StoreError> {
		let Some(identity) = self.identity(token, self.acl_expiry()) else {
			return Ok(false);
		};

		let entries = self.acl_entries(&identity, client_id, requested).await?;
		let allowed = evaluate(&entries, topic, requested);
		debug!(%identity, entries = entries.len(), allowed, "acl query finished");
		Ok(allowed)
	}

	/// Grants stored for an already verified `identity` at `requested`, with
	/// `%u` / `%c` placeholders expanded.
	///
	/// Filters with a misplaced `#`, or whose placeholders would expand to a
	/// wildcard or an extra level, are dropped with a warning.
	async fn acl_entries(
		&self,
		identity: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<Vec<AclEntry>, StoreError> {
		let rows = self
			.timed(
				"acl query",
				sqlx::query(&self.queries.acl_query)
					.bind(identity.to_string())
					.bind(requested.value())
					.fetch_all(&self.pool),
			)
			.await?;

		let mut entries = Vec::with_capacity(rows.len());
		for row in &rows {
			let (raw, granted) = acl_row(row, requested)?;
			let filter = match expand_placeholders(&raw, identity, client_id) {
				Ok(filter) => filter,
				Err(e) => {
					warn!(error = %e, "ignoring stored topic filter");
					continue;
				}
			};
			if let Err(e) = TopicFilter::parse(&*filter) {
				warn!(error = %e, "ignoring stored topic filter");
				continue;
			}
			entries.push(AclEntry::new(filter.into_owned(), granted));
		}
		Ok(entries)
	}

	/// Close the pool. Later calls fail with a closed-pool fault.
	pub async fn close(&self) {
		self.pool.close().await;
		debug!("local policy store closed");
	}

	fn user_expiry(&self) -> ExpiryCheck {
		if self.skip_user_expiration {
			ExpiryCheck::Skip
		} else {
			ExpiryCheck::Enforce
		}
	}

	fn acl_expiry(&self) -> ExpiryCheck {
		if self.skip_acl_expiration {
			ExpiryCheck::Skip
		} else {
			ExpiryCheck::Enforce
		}
	}

	fn identity(&self, token: &str, expiry: ExpiryCheck) -> Option<String> {
		match self.validator.verify_with(token, expiry) {
			Ok(claims) => Some(claims.identity),
			Err(e) => {
				debug!(error = %e, "token rejected");
				None
			}
		}
	}

	async fn count(
		&self,
		operation: &'static str,
		sql: &str,
		identity: &str,
	) -> Result<i64, StoreError> {
		let row = self
			.timed(
				operation,
				sqlx::query(sql)
					.bind(identity.to_string())
					.fetch_optional(&self.pool),
			)
			.await?;

		match row {
			Some(row) => row.try_get::<i64, _>(0).map_err(|e| StoreError::Decode {
				operation,
				message: e.to_string(),
			}),
			None => Ok(0),
		}
	}

	async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
	where
		F: Future<Output = Result<T, sqlx::Error>>,
	{
		match tokio::time::timeout(self.query_timeout, fut).await {
			Ok(result) => Ok(result?),
			Err(_) => Err(StoreError::Timeout {
				operation,
				timeout: self.query_timeout,
			}),
		}
	}
}

/// Topic filter from the first column; granted level from the second when
/// the template returns one, otherwise the level the query filtered on.
fn acl_row(row: &AnyRow, requested: AccessLevel) -> Result<(String, AccessLevel), StoreError> {
	let decode = |e: sqlx::Error| StoreError::Decode {
		operation: "acl query",
		message: e.to_string(),
	};

	let filter: String = row.try_get(0).map_err(decode)?;
	let granted = if row.len() > 1 {
		AccessLevel::new(row.try_get::<i64, _>(1).map_err(decode)?)
	} else {
		requested
	};
	Ok((filter, granted))
}

#[async_trait]
impl PolicyBackend for LocalPolicyStore {
	fn name(&self) -> &'static str {
		"local"
	}

	async fn authenticate(&self, token: &str) -> Result<bool, PolicyError> {
		Ok(LocalPolicyStore::authenticate(self, token).await?)
	}

	async fn is_privileged(&self, token: &str) -> Result<bool, PolicyError> {
		Ok(LocalPolicyStore::is_privileged(self, token).await?)
	}

	async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, PolicyError> {
		Ok(LocalPolicyStore::check_access(self, token, topic, client_id, requested).await?)
	}

	async fn close(&self) {
		LocalPolicyStore::close(self).await
	}
}
