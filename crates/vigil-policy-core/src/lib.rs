// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core contract shared by every Vigil policy backend.
//!
//! A backend answers three questions about a bearer token:
//!
//! - is it valid and bound to a known identity ([`PolicyBackend::authenticate`])
//! - does that identity hold elevated privilege ([`PolicyBackend::is_privileged`])
//! - may it access a topic at a level ([`PolicyBackend::check_access`])
//!
//! Every answer is a `Result<bool, PolicyError>`. `Ok(false)` is a legitimate
//! denial, including every kind of invalid credential. `Err(_)` means the
//! policy source itself failed and the caller decides whether to fail closed.

pub mod backend;
pub mod error;

pub use backend::PolicyBackend;
pub use error::{PolicyError, Result};
pub use vigil_acl::AccessLevel;
