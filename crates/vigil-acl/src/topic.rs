// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hierarchical topic filter matching.
//!
//! Filters and topics are `/`-separated levels. Matching walks both from the
//! first level:
//!
//! - a literal level must equal the topic level byte for byte
//! - `+` consumes exactly one topic level, which may be empty
//! - `#` is only legal as the final filter level and consumes every remaining
//!   topic level, including none at all
//!
//! Apart from a trailing `#`, filter and topic must have the same number of
//! levels. An empty string is a single zero-length level and only matches
//! itself.

use std::borrow::Cow;
use std::fmt;

use crate::error::FilterError;

/// Wildcard matching exactly one level.
pub const SINGLE_LEVEL: &str = "+";
/// Wildcard matching all remaining levels.
pub const MULTI_LEVEL: &str = "#";

const LEVEL_SEPARATOR: char = '/';

/// One level of a topic filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Literal(&'a str),
	SingleLevel,
	MultiLevel,
}

impl<'a> Segment<'a> {
	fn classify(level: &'a str) -> Self {
		match level {
			SINGLE_LEVEL => Segment::SingleLevel,
			MULTI_LEVEL => Segment::MultiLevel,
			literal => Segment::Literal(literal),
		}
	}
}

/// A validated topic filter.
///
/// Construction rejects filters that could never match (a `#` that is not the
/// last level), so a `TopicFilter` is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicFilter {
	raw: String,
}

impl TopicFilter {
	/// Parse and validate a stored filter.
	pub fn parse(filter: impl Into<String>) -> Result<Self, FilterError> {
		let raw = filter.into();
		let last = raw.split(LEVEL_SEPARATOR).count() - 1;

		if let Some(level) = raw
			.split(LEVEL_SEPARATOR)
			.enumerate()
			.find_map(|(i, level)| (level == MULTI_LEVEL && i != last).then_some(i))
		{
			return Err(FilterError::MultiLevelNotLast { filter: raw, level });
		}

		Ok(Self { raw })
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// The filter's levels, classified.
	pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
		self.raw.split(LEVEL_SEPARATOR).map(Segment::classify)
	}

	/// True if the filter contains `+` or `#`.
	pub fn has_wildcards(&self) -> bool {
		self.segments().any(|s| !matches!(s, Segment::Literal(_)))
	}

	/// Match a concrete topic against this filter.
	pub fn matches(&self, topic: &str) -> bool {
		match_levels(&self.raw, topic)
	}
}

impl fmt::Display for TopicFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

/// Match a concrete `topic` against a stored `filter`.
///
/// Filters with a misplaced `#` never match; use [`TopicFilter::parse`] to
/// detect them up front.
pub fn matches(filter: &str, topic: &str) -> bool {
	match_levels(filter, topic)
}

fn match_levels(filter: &str, topic: &str) -> bool {
	let mut filter_levels = filter.split(LEVEL_SEPARATOR).peekable();
	let mut topic_levels = topic.split(LEVEL_SEPARATOR);

	while let Some(level) = filter_levels.next() {
		match Segment::classify(level) {
			Segment::MultiLevel => return filter_levels.peek().is_none(),
			Segment::SingleLevel => {
				if topic_levels.next().is_none() {
					return false;
				}
			}
			Segment::Literal(expected) => {
				if topic_levels.next() != Some(expected) {
					return false;
				}
			}
		}
	}

	topic_levels.next().is_none()
}

/// Substitute `%u` with the identity and `%c` with the client id in a stored filter.
///
/// Substitution is a single left-to-right pass, so an identity or client id
/// that itself contains `%u` or `%c` is inserted verbatim and not expanded
/// again. Any other `%` sequence is left untouched.
///
/// A value containing `+`, `#` or `/` is refused when its placeholder occurs
/// in the filter, since it would widen the grant. The client id is chosen by
/// the client.
pub fn expand_placeholders<'a>(
	filter: &'a str,
	identity: &str,
	client_id: &str,
) -> Result<Cow<'a, str>, FilterError> {
	if !filter.contains('%') {
		return Ok(Cow::Borrowed(filter));
	}

	let mut expanded = String::with_capacity(filter.len() + identity.len() + client_id.len());
	let mut chars = filter.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '%' {
			let substitution = match chars.peek() {
				Some('u') => Some(("%u", identity)),
				Some('c') => Some(("%c", client_id)),
				_ => None,
			};
			if let Some((placeholder, value)) = substitution {
				chars.next();
				if !is_plain_level(value) {
					return Err(FilterError::UnsafeSubstitution {
						placeholder,
						value: value.to_string(),
					});
				}
				expanded.push_str(value);
				continue;
			}
		}
		expanded.push(c);
	}

	Ok(Cow::Owned(expanded))
}

/// True when `value` is a single level without wildcards.
fn is_plain_level(value: &str) -> bool {
	!value.contains(|c: char| c == '+' || c == '#' || c == LEVEL_SEPARATOR)
}
