use dsedit_editor::{Level, OpenOutcome, SaveStatus, SessionError, SessionEvent, SessionOptions};
use pretty_assertions::assert_eq;

use crate::common::{DATASET, harness, member};

#[tokio::test]
async fn edit_save_and_reopen() {
	let mut h = harness(SessionOptions::default());

	let opened = h.session.open_member(member("PROG1")).await.unwrap();
	assert_eq!(opened, OpenOutcome::Opened("       IDENTIFICATION DIVISION.\n".into()));
	assert_eq!(h.session.members().len(), 2);

	h.session.edit_buffer("       IDENTIFICATION DIVISION.\n       PROGRAM-ID. PROG1.\n");
	assert_eq!(h.session.status(), SaveStatus::Dirty);
	h.session.save_and_wait().await.unwrap();
	assert_eq!(h.session.status(), SaveStatus::Clean);

	h.session.open_member(member("PROG2")).await.unwrap();
	h.session.open_member(member("PROG1")).await.unwrap();
	assert_eq!(h.session.buffer(), "       IDENTIFICATION DIVISION.\n       PROGRAM-ID. PROG1.\n");
	assert_eq!(h.session.line_count(), 3);
	assert_eq!(h.ui.confirmation_count(), 0);
}

#[tokio::test]
async fn dirty_navigation_asks_and_respects_the_answer() {
	let mut h = harness(SessionOptions::default());
	h.session.open_member(member("PROG1")).await.unwrap();
	h.session.edit_buffer("CHANGED");

	h.ui.set_confirm(false);
	let outcome = h.session.open_member(member("PROG2")).await.unwrap();
	assert_eq!(outcome, OpenOutcome::Declined);
	assert_eq!(h.session.active(), &member("PROG1"));
	assert_eq!(h.session.buffer(), "CHANGED");
	assert!(
		h.ui.events()
			.contains(&SessionEvent::NavigationBlocked { target: member("PROG2") })
	);

	h.ui.set_confirm(true);
	h.session.open_member(member("PROG2")).await.unwrap();
	assert_eq!(h.session.status(), SaveStatus::Clean);
	assert_eq!(h.session.buffer(), "//JOB1 JOB\n");
	assert_eq!(h.ui.confirmation_count(), 2);
	// The discarded edit never reached the store.
	assert_eq!(
		h.store.content(&member("PROG1")).as_deref(),
		Some("       IDENTIFICATION DIVISION.\n")
	);
}

#[tokio::test]
async fn create_edit_delete() {
	let mut h = harness(SessionOptions::default());
	h.session.open_dataset(DATASET).await.unwrap();
	assert_eq!(h.session.active().member(), None);

	h.session.create_member(" newmem ").await.unwrap();
	assert_eq!(h.session.active(), &member("NEWMEM"));
	assert_eq!(h.store.content(&member("NEWMEM")).as_deref(), Some(""));
	assert_eq!(h.session.filter_members("new").len(), 1);

	let err = h.session.create_member("NEWMEM").await.unwrap_err();
	assert!(matches!(err, SessionError::DuplicateName(name) if name == "NEWMEM"));

	h.session.edit_buffer("HELLO");
	h.session.save_and_wait().await.unwrap();
	assert_eq!(h.store.content(&member("NEWMEM")).as_deref(), Some("HELLO"));

	h.session.delete_member("newmem").await.unwrap();
	assert_eq!(h.session.active().member(), None);
	assert_eq!(h.session.buffer(), "");
	assert_eq!(
		h.store.member_names(DATASET).unwrap(),
		vec!["PROG1".to_string(), "PROG2".to_string()]
	);
	assert_eq!(h.session.members().len(), 2);
}

#[tokio::test]
async fn missing_member_reports_and_keeps_state() {
	let mut h = harness(SessionOptions::default());
	h.session.open_member(member("PROG1")).await.unwrap();

	let err = h.session.open_member(member("GHOST")).await.unwrap_err();
	assert!(matches!(err, SessionError::Load { .. }));
	assert_eq!(h.session.active(), &member("PROG1"));

	let last = h.ui.notifications().pop().unwrap();
	assert_eq!(last.level, Level::Error);
}

#[tokio::test]
async fn unknown_dataset_still_opens_with_error_notice() {
	let mut h = harness(SessionOptions::default());
	h.session.open_dataset("NO.SUCH.PDS").await.unwrap();

	assert!(h.session.members().is_empty());
	assert!(h.ui.notifications().iter().any(|n| n.message == "Error loading members"));
}
