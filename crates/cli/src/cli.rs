use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dsedit")]
#[command(about = "Edit partitioned dataset members through the console API")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Console API base URL (overrides the configured one)
	#[arg(long, value_name = "URL", global = true)]
	pub api: Option<String>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List the members of a dataset
	Members {
		/// Dataset name, e.g. MY.SRC
		dataset: String,
		/// Only show members containing this text
		#[arg(long, short)]
		filter: Option<String>,
	},
	/// Print a member
	Cat {
		dataset: String,
		member: String,
	},
	/// Replace a member's content
	Put {
		dataset: String,
		member: String,
		/// Read content from this file instead of stdin
		#[arg(long, short, value_name = "PATH")]
		file: Option<PathBuf>,
	},
	/// Create an empty member
	New {
		dataset: String,
		member: String,
	},
	/// Delete a member
	Rm {
		dataset: String,
		member: String,
		/// Confirm the deletion
		#[arg(long)]
		yes: bool,
	},
	/// Inspect or change preferences
	Config {
		/// Config subcommand action.
		#[command(subcommand)]
		action: ConfigAction,
	},
}

/// Preference subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print the effective preferences as TOML
	Show,
	/// Print the preferences file location
	Path,
	/// Set one preference and write the file
	Set {
		key: String,
		value: String,
	},
}
