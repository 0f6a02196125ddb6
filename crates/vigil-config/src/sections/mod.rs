// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod backend;
mod local;
mod remote;
mod token;

pub use backend::{BackendConfigLayer, BackendMode};
pub use local::LocalConfigLayer;
pub use remote::RemoteConfigLayer;
pub use token::TokenConfigLayer;
