#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Editor session engine for partitioned dataset members.
//!
//! This crate owns the state behind a member editor: which member is open,
//! what the store last acknowledged, what the user is typing, and whether
//! the two differ.
//!
//! # Main Types
//!
//! - [`EditorSession`] - the session state machine and its programmatic API
//! - [`SaveStatus`] - Clean / Dirty / Saving / SaveFailed
//! - [`SessionUi`] - confirmation and event sink implemented by a front end
//!
//! # Architecture
//!
//! ```text
//! front end ──► EditorSession ──► ContentStore (load/list/delete, awaited)
//!                   ▲   │
//!                   │   └──► tokio::spawn(ContentStore::save)
//!                   │                 │
//!   SessionMsg ◄────┴── auto-save ◄───┘
//! ```
//!
//! Saves run detached so the buffer stays editable while they are in flight.
//! Their completions, like auto-save ticks, come back as [`SessionMsg`]s and
//! are applied by [`EditorSession::drain_messages`] or
//! [`EditorSession::process_next`].

/// Recurring auto-save timer.
mod autosave;
/// Session error taxonomy.
pub mod error;
/// Message bus between spawned work and the session.
pub mod msg;
/// User-facing notification payloads.
pub mod notifications;
mod session;
/// Front-end collaborator seam.
pub mod ui;

pub use autosave::DEFAULT_AUTO_SAVE_PERIOD;
pub use dsedit_primitives::{ContentStore, MemberListEntry, MemberRef, StoreError};
pub use error::{Result, SessionError};
pub use msg::{Applied, SaveToken, SessionMsg};
pub use notifications::{Level, Notification};
pub use session::{EditorSession, OpenOutcome, SaveOutcome, SaveStatus, SessionOptions};
pub use ui::{RecordingUi, SessionEvent, SessionUi};
