//! Common utilities for session integration tests.

use std::sync::Arc;
use std::time::Duration;

use dsedit_editor::{EditorSession, MemberRef, RecordingUi, SessionOptions};
use dsedit_store::MemoryContentStore;

pub const DATASET: &str = "MY.SRC";

/// A session wired to an in-memory store and a recording UI.
pub struct Harness {
	pub store: Arc<MemoryContentStore>,
	pub ui: Arc<RecordingUi>,
	pub session: EditorSession,
}

/// Builds a harness over a dataset holding `PROG1` and `PROG2`.
pub fn harness(options: SessionOptions) -> Harness {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let store = Arc::new(
		MemoryContentStore::new()
			.with_member(DATASET, "PROG1", "       IDENTIFICATION DIVISION.\n")
			.with_member(DATASET, "PROG2", "//JOB1 JOB\n"),
	);
	let ui = Arc::new(RecordingUi::new(true));
	let session = EditorSession::new(store.clone(), ui.clone(), options);
	Harness { store, ui, session }
}

/// Options with auto-save running at `period`.
pub fn auto_save_every(period: Duration) -> SessionOptions {
	SessionOptions {
		auto_save: true,
		auto_save_period: period,
	}
}

pub fn member(name: &str) -> MemberRef {
	MemberRef::new(DATASET, name)
}
