//! Error types for loading and storing preferences.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading, writing or editing preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading or writing a preferences file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid TOML or does not match the schema.
	#[error("failed to parse {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying TOML error.
		error: toml::de::Error,
	},

	/// Preferences could not be rendered as TOML.
	#[error("failed to serialize preferences: {0}")]
	Serialize(#[from] toml::ser::Error),

	/// `set` was given a key that does not exist.
	#[error("unknown preference {0:?} (expected one of: {keys})", keys = crate::KEYS.join(", "))]
	UnknownKey(String),

	/// A value is out of range or of the wrong type.
	#[error("invalid value {value:?} for {key}: {reason}")]
	InvalidValue {
		/// Preference name.
		key: &'static str,
		/// The rejected input.
		value: String,
		/// What was expected.
		reason: String,
	},

	/// Neither `$DSEDIT_CONFIG` nor a platform config directory is available.
	#[error("no configuration directory found; set DSEDIT_CONFIG")]
	NoConfigDir,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
