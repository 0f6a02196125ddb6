// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// A stored topic filter that can never be matched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
	#[error("'#' must be the last segment of a topic filter, found at level {level} of '{filter}'")]
	MultiLevelNotLast { filter: String, level: usize },

	/// A placeholder value would add levels or wildcards to the filter.
	#[error("refusing to substitute {placeholder} with '{value}': it contains '+', '#' or '/'")]
	UnsafeSubstitution {
		placeholder: &'static str,
		value: String,
	},
}
