// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use vigil_acl::AccessLevel;

use crate::error::PolicyError;

/// A source of identity, privilege and ACL decisions.
///
/// Implementations are shared across tasks and must not serialize unrelated
/// calls behind a single lock; only the transport's own limits apply.
#[async_trait]
pub trait PolicyBackend: Send + Sync {
	/// Short name for logs, e.g. `"local"` or `"remote"`.
	fn name(&self) -> &'static str;

	/// Is the token valid and bound to a known identity?
	async fn authenticate(&self, token: &str) -> Result<bool, PolicyError>;

	/// Does the token's identity hold elevated privilege?
	async fn is_privileged(&self, token: &str) -> Result<bool, PolicyError>;

	/// May the token's identity access `topic` at `requested`?
	async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, PolicyError>;

	/// Release pooled connections. Calls after `close` fail with
	/// [`PolicyError::Closed`] or a transport error.
	async fn close(&self);
}
