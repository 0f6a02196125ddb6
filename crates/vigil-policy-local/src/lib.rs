// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQL-backed policy store.
//!
//! Answers authentication, privilege and topic-access questions by verifying
//! the caller's token locally and running operator-supplied query templates
//! against any database sqlx's `Any` driver speaks (PostgreSQL, MySQL,
//! SQLite).
//!
//! Query templates take the identity as their first positional parameter.
//! The ACL template additionally takes the requested access level as its
//! second parameter and returns one row per granted topic filter; a second
//! integer column, when present, is the granted level and is re-checked
//! against the request.

pub mod config;
pub mod error;
pub mod pool;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{LocalConfigError, LocalStoreConfig, QueryTemplates};
pub use error::StoreError;
pub use pool::create_pool;
pub use store::LocalPolicyStore;
