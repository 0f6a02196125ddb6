// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

/// A policy source failed to produce a decision.
///
/// Never used for credential problems; those resolve to `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
	#[error("policy store error: {0}")]
	Store(String),

	#[error("policy service transport error: {0}")]
	Transport(String),

	#[error("{operation} timed out after {timeout:?}")]
	Timeout {
		operation: &'static str,
		timeout: Duration,
	},

	#[error("policy service returned a malformed response: {0}")]
	MalformedResponse(String),

	#[error("policy backend has been closed")]
	Closed,
}

impl PolicyError {
	/// Short machine-friendly label for logs and metrics.
	pub fn kind(&self) -> &'static str {
		match self {
			PolicyError::Store(_) => "store",
			PolicyError::Transport(_) => "transport",
			PolicyError::Timeout { .. } => "timeout",
			PolicyError::MalformedResponse(_) => "malformed_response",
			PolicyError::Closed => "closed",
		}
	}
}

pub type Result<T> = std::result::Result<T, PolicyError>;
