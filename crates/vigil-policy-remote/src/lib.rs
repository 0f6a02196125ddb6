// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP-delegated policy service.
//!
//! Forwards authentication, privilege and topic-access questions to a remote
//! authorization service. The caller's token travels in the `authorization`
//! header; request parameters are encoded as JSON or a URL-encoded form and
//! the verdict is read from a JSON body, the bare status code, or a literal
//! `ok` text body. See [`codec`] for the wire rules.

pub mod codec;
pub mod config;
pub mod error;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use codec::{
	decode_response, encode_request, EncodedRequest, ParamsMode, RequestPayload, ResponseMode,
	UnknownMode,
};
pub use config::{RemoteConfigError, RemoteServiceConfig};
pub use error::RemoteError;
pub use service::RemotePolicyService;
