// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory SQLite fixtures for tests across the workspace.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use sqlx::Row;

use crate::config::{LocalStoreConfig, QueryTemplates};

pub const USER_QUERY: &str = "SELECT count(*) FROM test_user WHERE username = ? LIMIT 1";
pub const SUPERUSER_QUERY: &str =
	"SELECT count(*) FROM test_user WHERE username = ? AND is_admin = 1";
pub const ACL_QUERY: &str = "SELECT test_acl.topic FROM test_acl, test_user \
	WHERE test_user.username = ? AND test_acl.test_user_id = test_user.id AND rw >= ?";

/// A single-connection pool so every query sees the same in-memory database.
pub async fn create_test_pool() -> AnyPool {
	sqlx::any::install_default_drivers();
	AnyPoolOptions::new()
		.max_connections(1)
		.min_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect("sqlite::memory:")
		.await
		.unwrap()
}

pub async fn create_test_user_table(pool: &AnyPool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS test_user (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			username TEXT NOT NULL UNIQUE,
			password_hash TEXT NOT NULL,
			is_admin INTEGER NOT NULL DEFAULT 0
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_test_acl_table(pool: &AnyPool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS test_acl (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			test_user_id INTEGER NOT NULL REFERENCES test_user(id),
			topic TEXT NOT NULL,
			rw INTEGER NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

/// Pool with both tables created.
pub async fn create_seeded_pool() -> AnyPool {
	let pool = create_test_pool().await;
	create_test_user_table(&pool).await;
	create_test_acl_table(&pool).await;
	pool
}

pub async fn insert_user(pool: &AnyPool, username: &str, is_admin: bool) -> i64 {
	let row = sqlx::query(
		"INSERT INTO test_user (username, password_hash, is_admin) VALUES (?, ?, ?) RETURNING id",
	)
	.bind(username.to_string())
	.bind("unused".to_string())
	.bind(i64::from(is_admin))
	.fetch_one(pool)
	.await
	.unwrap();
	row.try_get::<i64, _>(0).unwrap()
}

pub async fn insert_acl(pool: &AnyPool, user_id: i64, topic: &str, rw: i64) {
	sqlx::query("INSERT INTO test_acl (test_user_id, topic, rw) VALUES (?, ?, ?)")
		.bind(user_id)
		.bind(topic.to_string())
		.bind(rw)
		.execute(pool)
		.await
		.unwrap();
}

pub fn test_queries() -> QueryTemplates {
	QueryTemplates {
		user_query: USER_QUERY.to_string(),
		superuser_query: Some(SUPERUSER_QUERY.to_string()),
		acl_query: ACL_QUERY.to_string(),
	}
}

pub fn test_config() -> LocalStoreConfig {
	LocalStoreConfig::new("sqlite::memory:", test_queries())
}
