use std::time::Duration;

use dsedit_editor::{Applied, SaveStatus};
use pretty_assertions::assert_eq;

use crate::common::{auto_save_every, harness, member};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn timer_persists_dirty_buffer() {
	let mut h = harness(auto_save_every(Duration::from_secs(5)));
	h.session.open_member(member("PROG2")).await.unwrap();
	h.session.edit_buffer("//JOB2 JOB\n");

	let token = match h.session.process_next().await {
		Some(Applied::AutoSave(Some(token))) => token,
		other => panic!("expected an auto-save, got {other:?}"),
	};
	assert_eq!(h.session.status(), SaveStatus::Saving);
	assert_eq!(h.session.process_next().await, Some(Applied::Saved(token)));

	assert_eq!(h.session.status(), SaveStatus::Clean);
	assert_eq!(h.store.content(&member("PROG2")).as_deref(), Some("//JOB2 JOB\n"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clean_ticks_do_nothing() {
	let mut h = harness(auto_save_every(Duration::from_secs(5)));
	h.session.open_member(member("PROG2")).await.unwrap();

	for _ in 0..3 {
		assert_eq!(h.session.process_next().await, Some(Applied::AutoSave(None)));
	}
	assert_eq!(h.session.status(), SaveStatus::Clean);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn toggling_off_stops_saves() {
	let mut h = harness(auto_save_every(Duration::from_secs(5)));
	h.session.open_member(member("PROG2")).await.unwrap();
	h.session.edit_buffer("EDITED");

	assert!(!h.session.toggle_auto_save());
	tokio::time::sleep(Duration::from_secs(60)).await;
	assert_eq!(h.session.drain_messages(), 0);

	assert_eq!(h.session.status(), SaveStatus::Dirty);
	assert_eq!(h.store.content(&member("PROG2")).as_deref(), Some("//JOB1 JOB\n"));
	h.session.destroy();
}
