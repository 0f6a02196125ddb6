// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use vigil_policy_core::PolicyError;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("{operation} timed out after {timeout:?}")]
	Timeout {
		operation: &'static str,
		timeout: Duration,
	},

	#[error("malformed response: {0}")]
	MalformedResponse(String),

	#[error("policy service has been closed")]
	Closed,
}

impl From<RemoteError> for PolicyError {
	fn from(err: RemoteError) -> Self {
		match err {
			RemoteError::Http(e) => PolicyError::Transport(e.to_string()),
			RemoteError::Timeout { operation, timeout } => PolicyError::Timeout { operation, timeout },
			RemoteError::MalformedResponse(message) => PolicyError::MalformedResponse(message),
			RemoteError::Closed => PolicyError::Closed,
		}
	}
}

pub type Result<T> = std::result::Result<T, RemoteError>;
