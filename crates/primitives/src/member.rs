use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest member name a partitioned dataset accepts.
pub const MAX_MEMBER_NAME_LEN: usize = 8;

/// Identifies the unit being edited.
///
/// `member == None` means a dataset is selected but no member is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MemberRef {
	/// Fully qualified dataset name, e.g. `MY.SRC`.
	pub dataset: String,
	/// Member inside the dataset, if one is open.
	pub member: Option<String>,
}

impl MemberRef {
	/// Creates a reference to `member` inside `dataset`.
	pub fn new(dataset: impl Into<String>, member: impl Into<String>) -> Self {
		Self {
			dataset: dataset.into(),
			member: Some(member.into()),
		}
	}

	/// Creates a reference to a dataset with no member open.
	pub fn dataset(dataset: impl Into<String>) -> Self {
		Self {
			dataset: dataset.into(),
			member: None,
		}
	}

	/// Returns a reference to a sibling member in the same dataset.
	pub fn with_member(&self, member: impl Into<String>) -> Self {
		Self::new(self.dataset.clone(), member)
	}

	/// Returns the open member name, if any.
	pub fn member(&self) -> Option<&str> {
		self.member.as_deref()
	}

	/// Returns true when a dataset has been selected.
	pub fn has_dataset(&self) -> bool {
		!self.dataset.trim().is_empty()
	}

	/// Returns true when `name` is the open member.
	pub fn is_member(&self, name: &str) -> bool {
		self.member.as_deref() == Some(name)
	}
}

impl fmt::Display for MemberRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.member {
			Some(member) => write!(f, "{}({member})", self.dataset),
			None => f.write_str(&self.dataset),
		}
	}
}

/// Read-only snapshot of one member as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberListEntry {
	/// Member name.
	pub name: String,
	/// Last modification stamp as reported by the server, kept verbatim.
	#[serde(rename = "modified", default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
	pub last_modified: Option<String>,
}

impl MemberListEntry {
	/// Creates an entry without a modification stamp.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			last_modified: None,
		}
	}

	/// Attaches a modification stamp.
	pub fn modified(mut self, stamp: impl Into<String>) -> Self {
		self.last_modified = Some(stamp.into());
		self
	}
}

/// The server sends `""` for members it has no statistics for.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value.filter(|s| !s.is_empty()))
}

/// Reasons a proposed member name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberNameError {
	/// Nothing left after trimming.
	#[error("member name is empty")]
	Empty,
	/// More than [`MAX_MEMBER_NAME_LEN`] characters.
	#[error("member name {0:?} is longer than 8 characters")]
	TooLong(String),
	/// Contains a character outside `A-Z`, `0-9`, `@`, `#`, `$`.
	#[error("member name {name:?} contains invalid character {ch:?}")]
	InvalidChar {
		/// The normalized name.
		name: String,
		/// First offending character.
		ch: char,
	},
}

/// Upper-cases and trims `raw`, then checks it against `^[A-Z0-9@#$]{1,8}$`.
///
/// Returns the normalized name on success.
pub fn normalize_member_name(raw: &str) -> Result<String, MemberNameError> {
	let name = raw.trim().to_uppercase();
	if name.is_empty() {
		return Err(MemberNameError::Empty);
	}
	if let Some(ch) = name.chars().find(|c| !is_member_char(*c)) {
		return Err(MemberNameError::InvalidChar { name, ch });
	}
	if name.chars().count() > MAX_MEMBER_NAME_LEN {
		return Err(MemberNameError::TooLong(name));
	}
	Ok(name)
}

fn is_member_char(c: char) -> bool {
	c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '@' | '#' | '$')
}
