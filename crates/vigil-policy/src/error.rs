// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use vigil_policy_local::{LocalConfigError, StoreError};
use vigil_policy_remote::RemoteConfigError;
use vigil_token::TokenConfigError;

/// The engine could not be built. Nothing is usable after one of these.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("invalid local backend configuration: {0}")]
	Config(#[from] LocalConfigError),

	#[error("invalid token configuration: {0}")]
	Token(#[from] TokenConfigError),

	#[error("failed to open policy store: {0}")]
	Store(#[from] StoreError),

	#[error("invalid remote backend configuration: {0}")]
	Http(#[from] RemoteConfigError),
}
