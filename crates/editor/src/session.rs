//! The editor session state machine.
//!
//! An [`EditorSession`] tracks one open member of one dataset:
//!
//! - `saved` is the last content the store acknowledged,
//! - `buffer` is what the user is editing,
//! - [`SaveStatus`] is derived from comparing the two, never toggled by hand.
//!
//! # Save lifecycle
//!
//! | from | event | to |
//! |---|---|---|
//! | Clean, Dirty, SaveFailed | edit | Clean if `buffer == saved`, else Dirty |
//! | Dirty, SaveFailed | `save()` | Saving |
//! | Saving | edit | Saving |
//! | Saving | store ok | Clean if `buffer == snapshot`, else Dirty |
//! | Saving | store error | SaveFailed |
//!
//! Edits made while a save is in flight stay in the buffer. When the save is
//! acknowledged the status is recomputed against the snapshot that was
//! actually written, so those edits surface as `Dirty` instead of being
//! silently marked saved.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dsedit_primitives::{ContentStore, MemberListEntry, MemberRef, StoreResult, normalize_member_name};
use tracing::{debug, trace, warn};

use crate::autosave::{AutoSave, DEFAULT_AUTO_SAVE_PERIOD};
use crate::error::{Result, SessionError};
use crate::msg::{self, Applied, MsgReceiver, MsgSender, SaveToken, SessionMsg};
use crate::notifications::Notification;
use crate::ui::{SessionEvent, SessionUi};

/// Persistence state of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveStatus {
	/// Buffer matches the last acknowledged content.
	#[default]
	Clean,
	/// Buffer differs from the last acknowledged content.
	Dirty,
	/// A save is in flight.
	Saving,
	/// The last save attempt failed; the buffer still holds the edits.
	SaveFailed,
}

impl SaveStatus {
	/// Returns true when the buffer is known to differ from the last
	/// acknowledged content.
	///
	/// `Saving` is not included: whether edits would be lost then depends on
	/// the in-flight snapshot, see [`EditorSession::has_unsaved_edits`].
	pub fn has_unsaved_changes(self) -> bool {
		matches!(self, Self::Dirty | Self::SaveFailed)
	}
}

impl fmt::Display for SaveStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Clean => "Saved",
			Self::Dirty => "Unsaved changes",
			Self::Saving => "Saving...",
			Self::SaveFailed => "Save failed",
		})
	}
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
	/// The target is now active; carries its content.
	Opened(String),
	/// The user kept their unsaved changes; nothing changed.
	Declined,
}

impl OpenOutcome {
	pub fn is_opened(&self) -> bool {
		matches!(self, Self::Opened(_))
	}
}

/// Result of [`EditorSession::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
	/// Nothing to save; no store call was made.
	Unchanged,
	/// A save is now in flight.
	Started(SaveToken),
}

/// Construction options, usually derived from persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
	/// Start with the auto-save timer running.
	pub auto_save: bool,
	/// Period between auto-save attempts.
	pub auto_save_period: Duration,
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self {
			auto_save: false,
			auto_save_period: DEFAULT_AUTO_SAVE_PERIOD,
		}
	}
}

/// The save currently in flight.
#[derive(Debug)]
struct PendingSave {
	token: SaveToken,
	target: MemberRef,
	snapshot: String,
}

/// Editor state for one dataset member.
///
/// All mutation goes through `&mut self`; the session is meant to be owned
/// by a single UI loop. Operations that talk to the store are `async` and
/// awaited inline, except [`save`](Self::save), which runs detached and
/// reports back through the message bus.
pub struct EditorSession {
	store: Arc<dyn ContentStore>,
	ui: Arc<dyn SessionUi>,
	active: MemberRef,
	saved: String,
	buffer: String,
	status: SaveStatus,
	members: Vec<MemberListEntry>,
	pending_save: Option<PendingSave>,
	next_token: u64,
	auto_save: AutoSave,
	msg_tx: MsgSender,
	msg_rx: MsgReceiver,
}

impl EditorSession {
	/// Creates an empty session with no dataset selected.
	///
	/// Must be called inside a Tokio runtime when `options.auto_save` is set.
	pub fn new(store: Arc<dyn ContentStore>, ui: Arc<dyn SessionUi>, options: SessionOptions) -> Self {
		let (msg_tx, msg_rx) = msg::channel();
		let mut session = Self {
			store,
			ui,
			active: MemberRef::default(),
			saved: String::new(),
			buffer: String::new(),
			status: SaveStatus::Clean,
			members: Vec::new(),
			pending_save: None,
			next_token: 0,
			auto_save: AutoSave::new(options.auto_save_period),
			msg_tx,
			msg_rx,
		};
		if options.auto_save {
			session.auto_save.enable(&session.msg_tx);
		}
		session
	}

	/// Tears the session down, stopping the auto-save timer.
	///
	/// A save still in flight runs to completion but its result is dropped.
	pub fn destroy(mut self) {
		self.auto_save.disable();
		if let Some(pending) = self.pending_save.take() {
			debug!(member = %pending.target, token = pending.token.get(), "session.destroy.orphaned_save");
		}
		debug!(active = %self.active, status = ?self.status, "session.destroy");
	}

	pub fn active(&self) -> &MemberRef {
		&self.active
	}

	pub fn buffer(&self) -> &str {
		&self.buffer
	}

	/// Last content the store acknowledged.
	pub fn saved_content(&self) -> &str {
		&self.saved
	}

	pub fn status(&self) -> SaveStatus {
		self.status
	}

	/// Returns true while a save started by this session is in flight.
	pub fn has_pending_save(&self) -> bool {
		self.pending_save.is_some()
	}

	/// Returns true when navigating away would lose edits.
	///
	/// While a save is in flight this is the case only for edits made after
	/// its snapshot was taken.
	pub fn has_unsaved_edits(&self) -> bool {
		match self.status {
			SaveStatus::Saving => self.pending_save.as_ref().is_some_and(|p| p.snapshot != self.buffer),
			status => status.has_unsaved_changes(),
		}
	}

	/// Cached member list of the active dataset.
	pub fn members(&self) -> &[MemberListEntry] {
		&self.members
	}

	/// Members whose name contains `term`, compared upper-cased.
	pub fn filter_members(&self, term: &str) -> Vec<&MemberListEntry> {
		let term = term.trim().to_uppercase();
		self.members.iter().filter(|m| m.name.contains(&term)).collect()
	}

	/// Number of lines in the buffer; an empty buffer has one line.
	pub fn line_count(&self) -> usize {
		self.buffer.split('\n').count()
	}

	/// Opens `target`, replacing the buffer with its stored content.
	///
	/// With unsaved changes the UI is asked first; a refusal leaves the
	/// session untouched. A failed load also leaves the current buffer and
	/// member in place. A target without a member selects the dataset with an
	/// empty buffer. The member list of the target dataset is refreshed
	/// afterwards.
	pub async fn open_member(&mut self, target: MemberRef) -> Result<OpenOutcome> {
		if !target.has_dataset() {
			return Err(SessionError::NoDatasetSelected);
		}
		if !self.confirm_navigation(&target) {
			return Ok(OpenOutcome::Declined);
		}

		let content = if target.member.is_some() {
			match self.store.load(&target).await {
				Ok(content) => content,
				Err(source) => {
					warn!(member = %target, error = %source, "session.open.failed");
					self.notify(Notification::error(format!("Error loading {target}: {source}")));
					return Err(SessionError::Load { target, source });
				}
			}
		} else {
			String::new()
		};

		debug!(member = %target, len = content.len(), "session.open");
		self.switch_to(target, content.clone());
		self.refresh_members_or_notify().await;
		Ok(OpenOutcome::Opened(content))
	}

	/// Selects `dataset` with no member open.
	pub async fn open_dataset(&mut self, dataset: impl Into<String>) -> Result<OpenOutcome> {
		self.open_member(MemberRef::dataset(dataset)).await
	}

	/// Replaces the buffer and recomputes the status.
	///
	/// While a save is in flight the status stays `Saving`; the comparison
	/// happens when the save settles.
	pub fn edit_buffer(&mut self, content: impl Into<String>) {
		self.buffer = content.into();
		if self.status == SaveStatus::Saving {
			return;
		}
		let next = if self.buffer == self.saved {
			SaveStatus::Clean
		} else {
			SaveStatus::Dirty
		};
		self.set_status(next);
	}

	/// Starts saving the buffer.
	///
	/// A clean session returns [`SaveOutcome::Unchanged`] without touching the
	/// store. Saving is allowed from `Dirty` and, as a retry, from
	/// `SaveFailed`. The snapshot taken here is what gets written; edits made
	/// afterwards are kept for the next save.
	///
	/// Must be called inside a Tokio runtime.
	pub fn save(&mut self) -> Result<SaveOutcome> {
		match self.status {
			SaveStatus::Clean => return Ok(SaveOutcome::Unchanged),
			SaveStatus::Saving => return Err(SessionError::ConcurrentSave),
			SaveStatus::Dirty | SaveStatus::SaveFailed => {}
		}
		if self.active.member.is_none() {
			let message = if self.active.has_dataset() {
				"No member selected. Cannot save."
			} else {
				"No dataset selected. Cannot save."
			};
			self.notify(Notification::error(message));
			return Err(SessionError::NoMemberSelected);
		}

		self.next_token += 1;
		let token = SaveToken(self.next_token);
		let target = self.active.clone();
		let snapshot = self.buffer.clone();
		debug!(member = %target, token = token.get(), len = snapshot.len(), "session.save.start");

		self.pending_save = Some(PendingSave {
			token,
			target: target.clone(),
			snapshot: snapshot.clone(),
		});
		self.set_status(SaveStatus::Saving);

		let store = Arc::clone(&self.store);
		let tx = self.msg_tx.clone();
		tokio::spawn(async move {
			let result = store.save(&target, &snapshot).await;
			let _ = tx.send(SessionMsg::SaveDone { token, result });
		});

		Ok(SaveOutcome::Started(token))
	}

	/// Saves and processes messages until that save settles.
	pub async fn save_and_wait(&mut self) -> Result<()> {
		let token = match self.save()? {
			SaveOutcome::Unchanged => return Ok(()),
			SaveOutcome::Started(token) => token,
		};
		loop {
			match self.process_next().await {
				Some(Applied::Saved(t) | Applied::StaleSave(t)) if t == token => return Ok(()),
				Some(Applied::SaveFailed { token: t, error }) if t == token => {
					return Err(SessionError::Save {
						target: self.active.clone(),
						source: error,
					});
				}
				Some(_) => {}
				None => return Ok(()),
			}
		}
	}

	/// Creates an empty member in the active dataset and opens it.
	///
	/// The name is upper-cased and checked locally against the naming rule
	/// and the cached member list before the store is involved.
	pub async fn create_member(&mut self, name: &str) -> Result<OpenOutcome> {
		if !self.active.has_dataset() {
			self.notify(Notification::error("Please select a dataset first"));
			return Err(SessionError::NoDatasetSelected);
		}
		let name = match normalize_member_name(name) {
			Ok(name) => name,
			Err(e) => {
				self.notify(Notification::error(
					"Invalid member name. Use 1-8 characters (A-Z, 0-9, @, #, $)",
				));
				return Err(e.into());
			}
		};
		if self.members.iter().any(|m| m.name == name) {
			self.notify(Notification::error("Member already exists"));
			return Err(SessionError::DuplicateName(name));
		}

		let target = self.active.with_member(&name);
		if !self.confirm_navigation(&target) {
			return Ok(OpenOutcome::Declined);
		}

		if let Err(source) = self.store.save(&target, "").await {
			warn!(member = %target, error = %source, "session.create.failed");
			self.notify(Notification::error(format!("Failed to create {target}: {source}")));
			return Err(SessionError::Save { target, source });
		}

		debug!(member = %target, "session.create");
		self.members.push(MemberListEntry::new(&name));
		self.switch_to(target, String::new());
		self.notify(Notification::success("New member created"));
		self.refresh_members_or_notify().await;
		// A listing that lags behind the create must not reopen the name.
		if !self.members.iter().any(|m| m.name == name) {
			self.members.push(MemberListEntry::new(name));
		}
		Ok(OpenOutcome::Opened(String::new()))
	}

	/// Deletes a member of the active dataset.
	///
	/// Confirming the deletion is the caller's job. The name is checked
	/// against the naming rule before the store is involved. Deleting the
	/// open member closes it and leaves an empty, clean buffer.
	pub async fn delete_member(&mut self, name: &str) -> Result<()> {
		if !self.active.has_dataset() {
			return Err(SessionError::NoDatasetSelected);
		}
		let name = match normalize_member_name(name) {
			Ok(name) => name,
			Err(e) => {
				self.notify(Notification::error(
					"Invalid member name. Use 1-8 characters (A-Z, 0-9, @, #, $)",
				));
				return Err(e.into());
			}
		};
		let target = self.active.with_member(&name);

		if let Err(source) = self.store.delete(&target).await {
			warn!(member = %target, error = %source, "session.delete.failed");
			self.notify(Notification::error(format!("Failed to delete {target}: {source}")));
			return Err(SessionError::Delete { target, source });
		}

		debug!(member = %target, "session.delete");
		if self.active.is_member(&name) {
			let dataset = MemberRef::dataset(self.active.dataset.clone());
			self.switch_to(dataset, String::new());
		}
		self.members.retain(|m| m.name != name);
		self.notify(Notification::success(format!("{name} deleted")));
		self.refresh_members_or_notify().await;
		Ok(())
	}

	/// Replaces the member list cache with a fresh listing.
	pub async fn refresh_members(&mut self) -> Result<&[MemberListEntry]> {
		if !self.active.has_dataset() {
			return Err(SessionError::NoDatasetSelected);
		}
		let dataset = self.active.dataset.clone();
		let members = self.store.list(&dataset).await.map_err(|source| SessionError::List {
			dataset: dataset.clone(),
			source,
		})?;
		trace!(dataset = %dataset, count = members.len(), "session.members.refresh");
		self.members = members;
		self.ui.emit(SessionEvent::MembersRefreshed {
			dataset,
			count: self.members.len(),
		});
		Ok(&self.members)
	}

	pub fn is_auto_save_enabled(&self) -> bool {
		self.auto_save.is_enabled()
	}

	pub fn auto_save_period(&self) -> Duration {
		self.auto_save.period()
	}

	/// Starts the auto-save timer. Enabling twice keeps a single timer.
	///
	/// Must be called inside a Tokio runtime.
	pub fn enable_auto_save(&mut self) {
		self.auto_save.enable(&self.msg_tx);
	}

	/// Stops the auto-save timer. A no-op when already stopped.
	pub fn disable_auto_save(&mut self) {
		self.auto_save.disable();
	}

	/// Flips auto-save and tells the user. Returns the new state.
	pub fn toggle_auto_save(&mut self) -> bool {
		if self.auto_save.is_enabled() {
			self.auto_save.disable();
			self.notify(Notification::info("Auto-save disabled"));
			false
		} else {
			self.auto_save.enable(&self.msg_tx);
			self.notify(Notification::success("Auto-save enabled"));
			true
		}
	}

	/// Changes the auto-save period, restarting a running timer.
	pub fn set_auto_save_period(&mut self, period: Duration) {
		self.auto_save.set_period(period, &self.msg_tx);
	}

	/// Saves if there is something to save, otherwise does nothing.
	///
	/// Never reports an error; a blocked or failed attempt is logged only.
	pub fn attempt_auto_save(&mut self) -> Option<SaveToken> {
		if self.status != SaveStatus::Dirty || self.active.member.is_none() {
			trace!(status = ?self.status, "autosave.skip");
			return None;
		}
		match self.save() {
			Ok(SaveOutcome::Started(token)) => {
				debug!(member = %self.active, token = token.get(), "autosave.save");
				Some(token)
			}
			Ok(SaveOutcome::Unchanged) => None,
			Err(error) => {
				debug!(%error, "autosave.skip");
				None
			}
		}
	}

	/// Applies every queued message without waiting. Returns how many were applied.
	pub fn drain_messages(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(msg) = self.msg_rx.try_recv() {
			msg.apply(self);
			applied += 1;
		}
		applied
	}

	/// Waits for the next message and applies it.
	pub async fn process_next(&mut self) -> Option<Applied> {
		let msg = self.msg_rx.recv().await?;
		Some(msg.apply(self))
	}

	pub(crate) fn apply_save_done(&mut self, token: SaveToken, result: StoreResult<()>) -> Applied {
		let Some(pending) = self.pending_save.take_if(|p| p.token == token) else {
			debug!(token = token.get(), "session.save.stale");
			return Applied::StaleSave(token);
		};
		if pending.target != self.active {
			debug!(token = token.get(), member = %pending.target, active = %self.active, "session.save.stale");
			return Applied::StaleSave(token);
		}

		match result {
			Ok(()) => {
				self.saved = pending.snapshot;
				let next = if self.buffer == self.saved {
					SaveStatus::Clean
				} else {
					SaveStatus::Dirty
				};
				debug!(member = %pending.target, token = token.get(), status = ?next, "session.save.done");
				self.set_status(next);
				self.notify(Notification::success("File saved successfully"));
				Applied::Saved(token)
			}
			Err(error) => {
				warn!(member = %pending.target, token = token.get(), %error, "session.save.failed");
				self.set_status(SaveStatus::SaveFailed);
				self.notify(Notification::error(format!("Failed to save file: {error}")));
				Applied::SaveFailed { token, error }
			}
		}
	}

	pub(crate) fn apply_auto_save_tick(&mut self, generation: u64) -> Applied {
		if !self.auto_save.accepts(generation) {
			trace!(generation, "autosave.tick.stale");
			return Applied::StaleTick;
		}
		Applied::AutoSave(self.attempt_auto_save())
	}

	/// Asks before discarding unsaved changes. Returns true to proceed.
	fn confirm_navigation(&self, target: &MemberRef) -> bool {
		if !self.has_unsaved_edits() {
			return true;
		}
		if self.ui.confirm_discard(&self.active, target) {
			debug!(from = %self.active, to = %target, "session.discard");
			return true;
		}
		debug!(from = %self.active, to = %target, "session.navigation.blocked");
		self.ui.emit(SessionEvent::NavigationBlocked { target: target.clone() });
		false
	}

	/// Makes `target` active with `content` as both saved and buffered text.
	fn switch_to(&mut self, target: MemberRef, content: String) {
		if let Some(pending) = self.pending_save.take() {
			debug!(member = %pending.target, token = pending.token.get(), "session.save.orphaned");
		}
		if target.dataset != self.active.dataset {
			self.members.clear();
		}
		self.active = target;
		self.saved = content.clone();
		self.buffer = content;
		// Announced even when already clean: the front end resets its indicator per member.
		self.status = SaveStatus::Clean;
		self.ui.emit(SessionEvent::StatusChanged(SaveStatus::Clean));
	}

	async fn refresh_members_or_notify(&mut self) {
		if let Err(error) = self.refresh_members().await {
			warn!(%error, "session.members.refresh_failed");
			self.notify(Notification::warn("Error loading members"));
		}
	}

	fn set_status(&mut self, status: SaveStatus) {
		if self.status == status {
			return;
		}
		trace!(from = ?self.status, to = ?status, "session.status");
		self.status = status;
		self.ui.emit(SessionEvent::StatusChanged(status));
	}

	fn notify(&self, notification: Notification) {
		self.ui.emit(SessionEvent::Notify(notification));
	}
}

impl fmt::Debug for EditorSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EditorSession")
			.field("active", &self.active)
			.field("status", &self.status)
			.field("buffer_len", &self.buffer.len())
			.field("members", &self.members.len())
			.field("auto_save", &self.auto_save.is_enabled())
			.finish_non_exhaustive()
	}
}
