//! Error types for session operations.

use dsedit_primitives::{MemberNameError, MemberRef, StoreError};
use thiserror::Error;

/// Errors returned by [`crate::EditorSession`] operations.
///
/// Store-backed variants carry the ref involved and the underlying
/// [`StoreError`]; validation variants never reach the store.
#[derive(Debug, Error)]
pub enum SessionError {
	/// Loading member content failed.
	#[error("failed to load {target}: {source}")]
	Load {
		/// Member that was being opened.
		target: MemberRef,
		/// Store failure.
		source: StoreError,
	},

	/// Listing the members of a dataset failed.
	#[error("failed to list members of {dataset}: {source}")]
	List {
		/// Dataset that was being listed.
		dataset: String,
		/// Store failure.
		source: StoreError,
	},

	/// Persisting member content failed.
	#[error("failed to save {target}: {source}")]
	Save {
		/// Member that was being saved.
		target: MemberRef,
		/// Store failure.
		source: StoreError,
	},

	/// Deleting a member failed.
	#[error("failed to delete {target}: {source}")]
	Delete {
		/// Member that was being deleted.
		target: MemberRef,
		/// Store failure.
		source: StoreError,
	},

	/// A proposed member name breaks the naming rule.
	#[error("invalid member name: {0}")]
	InvalidName(#[from] MemberNameError),

	/// A member with this name is already listed for the dataset.
	#[error("member {0} already exists")]
	DuplicateName(String),

	/// A save is already in flight for this session.
	#[error("a save is already in progress")]
	ConcurrentSave,

	/// The operation needs an open member.
	#[error("no member selected")]
	NoMemberSelected,

	/// The operation needs a selected dataset.
	#[error("no dataset selected")]
	NoDatasetSelected,
}

impl SessionError {
	/// Returns the store failure behind this error, if any.
	pub fn store_error(&self) -> Option<&StoreError> {
		match self {
			Self::Load { source, .. } | Self::List { source, .. } | Self::Save { source, .. } | Self::Delete { source, .. } => Some(source),
			_ => None,
		}
	}

	/// Returns true when the failure was caused by connectivity.
	pub fn is_transport(&self) -> bool {
		self.store_error().is_some_and(StoreError::is_transport)
	}

	/// Returns true for purely local validation failures.
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::InvalidName(_) | Self::DuplicateName(_))
	}
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
