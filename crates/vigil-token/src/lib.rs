// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token verification for Vigil.
//!
//! [`TokenValidator::verify`] turns a signed JWT into [`Claims`] or a
//! [`TokenError`]. A `Claims` value only ever exists for a token whose
//! signature verified; every failure mode (bad structure, bad signature,
//! outside its validity window, no identity) is a `TokenError`.
//!
//! Verification is pure and synchronous. The current time comes from an
//! injectable [`Clock`] so expiry logic can be tested without waiting.
//!
//! # Example
//!
//! ```no_run
//! use vigil_token::{TokenConfig, TokenValidator};
//!
//! let config = TokenConfig::hmac("some_jwt_secret");
//! let validator = TokenValidator::new(&config)?;
//!
//! match validator.verify("eyJhbGciOi...") {
//!     Ok(claims) => println!("token for {}", claims.identity),
//!     Err(e) => println!("rejected: {e}"),
//! }
//! # Ok::<(), vigil_token::TokenConfigError>(())
//! ```

pub mod claims;
pub mod clock;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod validator;

pub use claims::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{KeySource, TokenConfig, DEFAULT_IDENTITY_CLAIM};
pub use error::{TokenConfigError, TokenError};
pub use jsonwebtoken::Algorithm;
pub use validator::{ExpiryCheck, TokenValidator};
