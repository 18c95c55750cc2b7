//! Async message bus between spawned work and the session.
//!
//! Detached saves and the auto-save timer send [`SessionMsg`] variants back
//! to the session. The owner drains them between user actions, the same way
//! a UI loop drains events before a redraw.
//!
//! # Architecture
//!
//! ```text
//! save task ───────┐
//!                  ├──► SessionMsg ──► drain_messages() ──► session state update
//! auto-save timer ─┘
//! ```
//!
//! Every message carries the token or generation it was issued under, so a
//! completion that arrives after the session moved on is dropped instead of
//! being applied to the wrong member.

use dsedit_primitives::{StoreError, StoreResult};
use tokio::sync::mpsc;

use crate::EditorSession;

/// Channel sender held by spawned work.
pub type MsgSender = mpsc::UnboundedSender<SessionMsg>;

/// Channel receiver owned by the session.
pub type MsgReceiver = mpsc::UnboundedReceiver<SessionMsg>;

/// Creates a new message channel pair.
pub fn channel() -> (MsgSender, MsgReceiver) {
	mpsc::unbounded_channel()
}

/// Identifies one save attempt of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveToken(pub(crate) u64);

impl SaveToken {
	/// Raw token value, monotonically increasing per session.
	pub const fn get(self) -> u64 {
		self.0
	}
}

/// Messages dispatched to session state.
#[derive(Debug)]
pub enum SessionMsg {
	/// A detached save finished.
	SaveDone {
		/// Token issued when the save started.
		token: SaveToken,
		/// Store outcome.
		result: StoreResult<()>,
	},
	/// The auto-save timer fired.
	AutoSaveTick {
		/// Generation of the timer that fired.
		generation: u64,
	},
}

/// What applying a message did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
	/// A save was acknowledged and `saved` now holds its snapshot.
	Saved(SaveToken),
	/// A save failed; the session is in `SaveFailed`.
	SaveFailed {
		/// Token of the failed save.
		token: SaveToken,
		/// Store failure.
		error: StoreError,
	},
	/// A save completed after the session moved on; nothing changed.
	StaleSave(SaveToken),
	/// An auto-save tick was handled, possibly starting a save.
	AutoSave(Option<SaveToken>),
	/// A tick from a cancelled timer was ignored.
	StaleTick,
}

impl SessionMsg {
	/// Applies this message to the session.
	pub fn apply(self, session: &mut EditorSession) -> Applied {
		match self {
			Self::SaveDone { token, result } => session.apply_save_done(token, result),
			Self::AutoSaveTick { generation } => session.apply_auto_save_tick(generation),
		}
	}
}
