use async_trait::async_trait;
use thiserror::Error;

use crate::member::{MemberListEntry, MemberRef};

/// Failures reported by a [`ContentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	/// The request never produced a response (connection refused, timeout, ...).
	#[error("transport error: {0}")]
	Transport(String),
	/// The server answered with a non-success HTTP status.
	#[error("server returned status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly truncated.
		body: String,
	},
	/// The server understood the request and refused it.
	#[error("{0}")]
	Rejected(String),
	/// The response body could not be decoded.
	#[error("invalid response: {0}")]
	Decode(String),
}

impl StoreError {
	/// Returns true when the failure is a connectivity problem rather than a
	/// domain refusal.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Backend holding member content.
///
/// Every call may fail; callers keep their local state on failure.
#[async_trait]
pub trait ContentStore: Send + Sync {
	/// Lists the members of `dataset`.
	async fn list(&self, dataset: &str) -> StoreResult<Vec<MemberListEntry>>;

	/// Loads the content of a member.
	async fn load(&self, target: &MemberRef) -> StoreResult<String>;

	/// Persists `content` as the full content of a member, creating it if needed.
	async fn save(&self, target: &MemberRef, content: &str) -> StoreResult<()>;

	/// Deletes a member.
	async fn delete(&self, target: &MemberRef) -> StoreResult<()>;
}
