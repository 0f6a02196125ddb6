// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::LocalStoreConfig;
use crate::error::StoreError;

/// Create a connection pool for whichever driver the URL scheme names.
///
/// # Arguments
/// * `config` - supplies the URL (e.g. `postgres://...`, `mysql://...`,
///   `sqlite:./vigil.db`), pool size and acquire timeout
///
/// # Errors
/// Returns `StoreError::Sqlx` if the URL is invalid or connection fails.
#[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_pool(config: &LocalStoreConfig) -> Result<AnyPool, StoreError> {
	sqlx::any::install_default_drivers();

	let pool = AnyPoolOptions::new()
		.max_connections(config.max_connections)
		.acquire_timeout(config.query_timeout)
		.connect(&config.database_url)
		.await?;

	tracing::debug!("database pool created");
	Ok(pool)
}
