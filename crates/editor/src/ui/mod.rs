//! Front-end collaborator seam.
//!
//! The session never renders anything. It asks a [`SessionUi`] whether
//! unsaved work may be discarded and reports everything else as
//! [`SessionEvent`]s.

use std::sync::atomic::{AtomicBool, Ordering};

use dsedit_primitives::MemberRef;
use parking_lot::Mutex;

use crate::notifications::Notification;
use crate::session::SaveStatus;

/// Events emitted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	/// The save status changed.
	StatusChanged(SaveStatus),
	/// Navigation to `target` was refused because the user kept their edits.
	NavigationBlocked {
		/// Where the user tried to go.
		target: MemberRef,
	},
	/// Something worth showing to the user.
	Notify(Notification),
	/// The member list cache was replaced.
	MembersRefreshed {
		/// Dataset the list belongs to.
		dataset: String,
		/// Number of members listed.
		count: usize,
	},
}

/// Implemented by whatever presents the session to a user.
pub trait SessionUi: Send + Sync {
	/// Asks whether unsaved changes in `current` may be discarded to open `target`.
	fn confirm_discard(&self, current: &MemberRef, target: &MemberRef) -> bool;

	/// Receives a session event.
	fn emit(&self, event: SessionEvent);
}

/// Headless [`SessionUi`] that answers confirmations from a flag and keeps
/// every event.
///
/// Used by scripted front ends and tests.
#[derive(Debug)]
pub struct RecordingUi {
	confirm: AtomicBool,
	confirmations: Mutex<Vec<(MemberRef, MemberRef)>>,
	events: Mutex<Vec<SessionEvent>>,
}

impl Default for RecordingUi {
	fn default() -> Self {
		Self::new(true)
	}
}

impl RecordingUi {
	/// Creates a recorder that answers every confirmation with `confirm`.
	pub fn new(confirm: bool) -> Self {
		Self {
			confirm: AtomicBool::new(confirm),
			confirmations: Mutex::new(Vec::new()),
			events: Mutex::new(Vec::new()),
		}
	}

	/// Changes the answer given to future confirmations.
	pub fn set_confirm(&self, confirm: bool) {
		self.confirm.store(confirm, Ordering::Relaxed);
	}

	/// Number of confirmations requested so far.
	pub fn confirmation_count(&self) -> usize {
		self.confirmations.lock().len()
	}

	/// Returns a copy of all recorded events.
	pub fn events(&self) -> Vec<SessionEvent> {
		self.events.lock().clone()
	}

	/// Removes and returns all recorded events.
	pub fn take_events(&self) -> Vec<SessionEvent> {
		std::mem::take(&mut *self.events.lock())
	}

	/// Returns the recorded notifications in order.
	pub fn notifications(&self) -> Vec<Notification> {
		self.events
			.lock()
			.iter()
			.filter_map(|event| match event {
				SessionEvent::Notify(n) => Some(n.clone()),
				_ => None,
			})
			.collect()
	}

	/// Returns the recorded status transitions in order.
	pub fn statuses(&self) -> Vec<SaveStatus> {
		self.events
			.lock()
			.iter()
			.filter_map(|event| match event {
				SessionEvent::StatusChanged(s) => Some(*s),
				_ => None,
			})
			.collect()
	}
}

impl SessionUi for RecordingUi {
	fn confirm_discard(&self, current: &MemberRef, target: &MemberRef) -> bool {
		self.confirmations.lock().push((current.clone(), target.clone()));
		self.confirm.load(Ordering::Relaxed)
	}

	fn emit(&self, event: SessionEvent) {
		self.events.lock().push(event);
	}
}
