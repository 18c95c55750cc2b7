//! Subcommand implementations.
//!
//! Member commands drive a short-lived [`EditorSession`] so they share the
//! session's validation and error reporting with interactive front ends.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use dsedit_config::Preferences;
use dsedit_editor::{
	ContentStore, EditorSession, Level, MemberRef, RecordingUi, SaveStatus, SessionEvent, SessionOptions,
};

use crate::cli::{Command, ConfigAction};

/// Runs a member command against `store`, writing results to `out`.
pub async fn run_member_command(
	command: Command,
	store: Arc<dyn ContentStore>,
	prefs: &Preferences,
	out: &mut impl Write,
) -> anyhow::Result<()> {
	// Commands never navigate away from edits; confirmations are refused.
	let ui = Arc::new(RecordingUi::new(false));
	let options = SessionOptions {
		auto_save: false,
		auto_save_period: prefs.auto_save_period(),
	};
	let mut session = EditorSession::new(store, ui.clone(), options);

	let result = run_in_session(command, &mut session, &ui, out).await;
	// A failed command reports through its error alone.
	let failed = result.is_err();
	for notification in ui.notifications() {
		match notification.level {
			Level::Error | Level::Warn if failed => tracing::debug!("{}", notification.message),
			Level::Error | Level::Warn => tracing::warn!("{}", notification.message),
			Level::Info | Level::Success => tracing::info!("{}", notification.message),
		}
	}
	session.destroy();
	result
}

async fn run_in_session(
	command: Command,
	session: &mut EditorSession,
	ui: &RecordingUi,
	out: &mut impl Write,
) -> anyhow::Result<()> {
	match command {
		Command::Members { dataset, filter } => {
			session.open_dataset(dataset.as_str()).await?;
			// Opening lists the dataset once; a failed listing only shows up as a missing event.
			let listed = ui
				.events()
				.iter()
				.any(|e| matches!(e, SessionEvent::MembersRefreshed { dataset: d, .. } if *d == dataset));
			if !listed {
				bail!("cannot list members of {dataset}");
			}
			for member in session.filter_members(filter.as_deref().unwrap_or_default()) {
				match &member.last_modified {
					Some(stamp) => writeln!(out, "{:<8}  {stamp}", member.name)?,
					None => writeln!(out, "{}", member.name)?,
				}
			}
		}
		Command::Cat { dataset, member } => {
			session.open_member(MemberRef::new(dataset, member.to_uppercase())).await?;
			out.write_all(session.buffer().as_bytes())?;
		}
		Command::Put { dataset, member, file } => {
			let content = match &file {
				Some(path) => std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?,
				None => std::io::read_to_string(std::io::stdin()).context("cannot read stdin")?,
			};
			let target = MemberRef::new(dataset, member.to_uppercase());
			session
				.open_member(target.clone())
				.await
				.with_context(|| format!("cannot open {target}; create it first with `dsedit new`"))?;
			session.edit_buffer(content);
			if session.status() == SaveStatus::Clean {
				writeln!(out, "{target} unchanged")?;
				return Ok(());
			}
			session.save_and_wait().await?;
			writeln!(out, "saved {target} ({} lines)", session.line_count())?;
		}
		Command::New { dataset, member } => {
			session.open_dataset(dataset).await?;
			session.create_member(&member).await?;
			writeln!(out, "created {}", session.active())?;
		}
		Command::Rm { dataset, member, yes } => {
			let target = MemberRef::new(dataset.as_str(), member.to_uppercase());
			if !yes {
				bail!("refusing to delete {target} without --yes");
			}
			session.open_dataset(dataset).await?;
			session.delete_member(&member).await?;
			writeln!(out, "deleted {target}")?;
		}
		Command::Config { .. } => bail!("config commands do not use a session"),
	}
	Ok(())
}

/// Runs a `config` subcommand against the preferences file at `path`.
pub fn run_config(action: ConfigAction, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
	match action {
		ConfigAction::Show => {
			let prefs = Preferences::load_from(path)?;
			out.write_all(prefs.to_toml()?.as_bytes())?;
		}
		ConfigAction::Path => writeln!(out, "{}", path.display())?,
		ConfigAction::Set { key, value } => {
			let mut prefs = Preferences::load_from(path)?;
			prefs.set(&key, &value)?;
			prefs.save_to(path)?;
			writeln!(out, "{key} updated in {}", path.display())?;
		}
	}
	Ok(())
}
