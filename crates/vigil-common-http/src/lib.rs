// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for Vigil.
//!
//! Every outbound request identifies itself as `vigil/{version}` so remote
//! authorization services can tell policy traffic apart in their access logs.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Creates a client builder with the standard Vigil User-Agent header.
///
/// # Example
/// ```ignore
/// let client = vigil_common_http::builder()
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a client builder with the User-Agent, a whole-request deadline and
/// a connect deadline of the same length.
///
/// A request that hits the deadline fails with an error for which
/// [`reqwest::Error::is_timeout`] is true; it never resolves to a response.
pub fn builder_with_timeout(timeout: Duration) -> ClientBuilder {
	builder().timeout(timeout).connect_timeout(timeout)
}

/// Returns the standard Vigil User-Agent string.
///
/// Format: `vigil/{crate_version}`
pub fn user_agent() -> String {
	format!("vigil/{}", env!("CARGO_PKG_VERSION"))
}
