//! dsedit command line client.
//!
//! Thin front end over the editor session: every member command opens a
//! session against the console API, performs one operation and exits.

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use dsedit_config::Preferences;
use dsedit_store::HttpContentStore;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config_path = dsedit_config::default_path()?;
	let mut stdout = std::io::stdout().lock();

	if let Command::Config { action } = cli.command {
		return commands::run_config(action, &config_path, &mut stdout);
	}

	let prefs = Preferences::load_from(&config_path)
		.with_context(|| format!("cannot load preferences from {}", config_path.display()))?;
	let api = cli.api.unwrap_or_else(|| prefs.api_base.clone());
	debug!(%api, "cli.start");

	let store = Arc::new(HttpContentStore::new(api));
	commands::run_member_command(cli.command, store, &prefs, &mut stdout).await
}
