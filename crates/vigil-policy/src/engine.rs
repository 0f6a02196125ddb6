// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The decision facade over one policy backend.

use tracing::{debug, error, instrument};
use vigil_acl::AccessLevel;
use vigil_config::{BackendConfig, EngineConfig};
use vigil_policy_core::{PolicyBackend, PolicyError};
use vigil_policy_local::LocalPolicyStore;
use vigil_policy_remote::RemotePolicyService;
use vigil_token::TokenValidator;

use crate::error::EngineError;

#[derive(Debug, Clone)]
enum Backend {
	Local(LocalPolicyStore),
	Remote(RemotePolicyService),
}

impl Backend {
	fn as_dyn(&self) -> &dyn PolicyBackend {
		match self {
			Backend::Local(store) => store,
			Backend::Remote(service) => service,
		}
	}
}

/// Answers broker authorization questions from exactly one backend chosen at
/// construction.
///
/// Cheap to clone and safe to share between tasks; clones share the
/// underlying connection pool or HTTP client.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
	backend: Backend,
}

impl PolicyEngine {
	/// Build the backend `config` selects.
	///
	/// Local mode always verifies tokens itself, so it needs key material.
	/// Remote mode verifies locally only when key material is configured and
	/// otherwise forwards the raw token.
	pub async fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
		match &config.backend {
			BackendConfig::Local(local) => {
				local.validate()?;
				let validator = TokenValidator::new(&config.token)?;
				let store = LocalPolicyStore::connect(local, validator).await?;
				Ok(Self::local(store))
			}
			BackendConfig::Remote(remote) => {
				let validator = if config.token.has_key() {
					Some(TokenValidator::new(&config.token)?)
				} else {
					None
				};
				let service = RemotePolicyService::new(remote, validator)?;
				Ok(Self::remote(service))
			}
		}
	}

	pub fn local(store: LocalPolicyStore) -> Self {
		debug!("policy engine using local store");
		Self {
			backend: Backend::Local(store),
		}
	}

	pub fn remote(service: RemotePolicyService) -> Self {
		debug!("policy engine using remote service");
		Self {
			backend: Backend::Remote(service),
		}
	}

	/// `"local"` or `"remote"`.
	pub fn backend_name(&self) -> &'static str {
		self.backend.as_dyn().name()
	}

	/// May the holder of `token` connect?
	///
	/// `_legacy_password` keeps the call shape of password-based backends and
	/// is ignored.
	#[instrument(skip(self, token, _legacy_password), fields(backend = self.backend_name()))]
	pub async fn authenticate(
		&self,
		token: &str,
		_legacy_password: &str,
	) -> Result<bool, PolicyError> {
		let result = self.backend.as_dyn().authenticate(token).await;
		log_outcome("authenticate", &result);
		result
	}

	/// Is the holder of `token` a superuser?
	#[instrument(skip(self, token), fields(backend = self.backend_name()))]
	pub async fn is_privileged(&self, token: &str) -> Result<bool, PolicyError> {
		let result = self.backend.as_dyn().is_privileged(token).await;
		log_outcome("is_privileged", &result);
		result
	}

	/// May the holder of `token`, connected as `client_id`, use `topic` at
	/// `requested`?
	#[instrument(skip(self, token), fields(backend = self.backend_name()))]
	pub async fn check_access(
		&self,
		token: &str,
		topic: &str,
		client_id: &str,
		requested: AccessLevel,
	) -> Result<bool, PolicyError> {
		let result = self
			.backend
			.as_dyn()
			.check_access(token, topic, client_id, requested)
			.await;
		log_outcome("check_access", &result);
		result
	}

	/// Release the backend's connections. Later decisions fail with a fault.
	pub async fn close(&self) {
		self.backend.as_dyn().close().await;
	}
}

fn log_outcome(operation: &'static str, result: &Result<bool, PolicyError>) {
	match result {
		Ok(allowed) => debug!(operation, allowed, "decision"),
		Err(e) => tracing::warn!(operation, kind = e.kind(), error = %e, "policy fault"),
	}
}

/// Collapse a decision to a boolean, denying on fault.
///
/// The fault is logged at `error` so a backend outage stays visible even
/// though the broker only sees a denial.
pub fn fail_closed(operation: &str, result: Result<bool, PolicyError>) -> bool {
	match result {
		Ok(allowed) => allowed,
		Err(e) => {
			error!(operation, kind = e.kind(), error = %e, "policy fault, denying");
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn fail_closed_passes_decisions_through() {
		assert!(fail_closed("authenticate", Ok(true)));
		assert!(!fail_closed("authenticate", Ok(false)));
	}

	#[test]
	fn fail_closed_denies_on_fault() {
		assert!(!fail_closed("check_access", Err(PolicyError::Closed)));
		assert!(!fail_closed(
			"check_access",
			Err(PolicyError::Timeout {
				operation: "acl query",
				timeout: Duration::from_secs(5),
			})
		));
	}
}
