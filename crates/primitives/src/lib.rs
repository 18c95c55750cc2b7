//! Core types shared by the editor session and its storage backends.

/// Member identities, list entries and the member naming rule.
pub mod member;
/// The asynchronous content store seam.
pub mod store;

pub use member::{MAX_MEMBER_NAME_LEN, MemberListEntry, MemberNameError, MemberRef, normalize_member_name};
pub use store::{ContentStore, StoreError, StoreResult};
