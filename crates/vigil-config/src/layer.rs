// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{BackendConfigLayer, LocalConfigLayer, RemoteConfigLayer, TokenConfigLayer};

/// One source's view of the configuration; later layers override earlier ones
/// field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VigilConfigLayer {
	#[serde(default)]
	pub backend: Option<BackendConfigLayer>,
	#[serde(default)]
	pub token: Option<TokenConfigLayer>,
	#[serde(default)]
	pub local: Option<LocalConfigLayer>,
	#[serde(default)]
	pub remote: Option<RemoteConfigLayer>,
}

impl VigilConfigLayer {
	pub fn merge(&mut self, other: VigilConfigLayer) {
		merge_section(&mut self.backend, other.backend, BackendConfigLayer::merge);
		merge_section(&mut self.token, other.token, TokenConfigLayer::merge);
		merge_section(&mut self.local, other.local, LocalConfigLayer::merge);
		merge_section(&mut self.remote, other.remote, RemoteConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(b), Some(o)) => merge(b, o),
		(None, Some(o)) => *base = Some(o),
		(_, None) => {}
	}
}
