// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic filter matching and access levels.
//!
//! This crate is the single source of truth for wildcard semantics:
//!
//! - [`matches`] / [`TopicFilter`] - reconcile a stored, possibly wildcarded
//!   filter against a concrete topic
//! - [`AccessLevel`] - the ordered access scale and its [`satisfies`] rule
//! - [`AclEntry`] / [`evaluate`] - existential evaluation of stored grants
//! - [`expand_placeholders`] - `%u` / `%c` substitution in stored filters
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of tasks at once.
//!
//! # Example
//!
//! ```
//! use vigil_acl::{matches, satisfies, AccessLevel};
//!
//! assert!(matches("test/topic/+", "test/topic/whatever"));
//! assert!(matches("test/#", "test/what/ever"));
//! assert!(!matches("test/topic/+", "test/topic/a/b"));
//!
//! assert!(satisfies(AccessLevel::READ, AccessLevel::READ));
//! assert!(!satisfies(AccessLevel::READ, AccessLevel::WRITE));
//! ```

pub mod entry;
pub mod error;
pub mod level;
pub mod topic;

pub use entry::{evaluate, AclEntry};
pub use error::FilterError;
pub use level::{satisfies, AccessLevel};
pub use topic::{expand_placeholders, matches, Segment, TopicFilter, MULTI_LEVEL, SINGLE_LEVEL};
