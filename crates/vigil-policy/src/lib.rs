// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token-based authorization for publish/subscribe brokers.
//!
//! [`PolicyEngine`] answers three questions for a broker:
//!
//! - may this client connect? ([`PolicyEngine::authenticate`])
//! - is it a superuser? ([`PolicyEngine::is_privileged`])
//! - may it publish or subscribe to this topic? ([`PolicyEngine::check_access`])
//!
//! Each answer is `Ok(true)`, `Ok(false)` for a legitimate denial (including
//! every kind of bad token), or `Err(PolicyError)` when the policy source
//! could not be consulted. Brokers that deny on fault can use
//! [`fail_closed`].
//!
//! The engine is built once from an [`EngineConfig`] and is backed by either
//! a SQL store or a remote HTTP authority for its whole lifetime.
//!
//! # Example
//!
//! ```ignore
//! use vigil_policy::{fail_closed, AccessLevel, PolicyEngine};
//!
//! let config = vigil_config::load_config()?;
//! let engine = PolicyEngine::from_config(&config).await?;
//!
//! let allowed = fail_closed(
//!     "check_access",
//!     engine.check_access(token, "sensors/1/temp", "client-1", AccessLevel::READ).await,
//! );
//! ```

pub mod engine;
pub mod error;

pub use engine::{fail_closed, PolicyEngine};
pub use error::EngineError;

pub use vigil_acl::AccessLevel;
pub use vigil_config::{BackendConfig, EngineConfig};
pub use vigil_policy_core::{PolicyBackend, PolicyError};
