// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use vigil_policy_core::PolicyError;

use crate::config::LocalConfigError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("Invalid local store configuration: {0}")]
	Config(#[from] LocalConfigError),

	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("{operation} timed out after {timeout:?}")]
	Timeout {
		operation: &'static str,
		timeout: Duration,
	},

	#[error("Unexpected result shape from {operation}: {message}")]
	Decode {
		operation: &'static str,
		message: String,
	},
}

impl From<StoreError> for PolicyError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::Sqlx(sqlx::Error::PoolClosed) => PolicyError::Closed,
			StoreError::Timeout { operation, timeout } => PolicyError::Timeout { operation, timeout },
			other => PolicyError::Store(other.to_string()),
		}
	}
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closed_pool_maps_to_closed() {
		let err: PolicyError = StoreError::Sqlx(sqlx::Error::PoolClosed).into();
		assert!(matches!(err, PolicyError::Closed));
	}

	#[test]
	fn timeout_keeps_operation() {
		let err: PolicyError = StoreError::Timeout {
			operation: "acl query",
			timeout: Duration::from_millis(250),
		}
		.into();
		match err {
			PolicyError::Timeout { operation, timeout } => {
				assert_eq!(operation, "acl query");
				assert_eq!(timeout, Duration::from_millis(250));
			}
			other => panic!("expected timeout, got {other:?}"),
		}
	}

	#[test]
	fn config_errors_map_to_store() {
		let err: PolicyError = StoreError::from(LocalConfigError::MissingDatabaseUrl).into();
		assert!(matches!(err, PolicyError::Store(_)));
	}

	#[test]
	fn other_faults_map_to_store() {
		let err: PolicyError = StoreError::Decode {
			operation: "user query",
			message: "no columns".to_string(),
		}
		.into();
		assert!(matches!(err, PolicyError::Store(_)));
	}
}
