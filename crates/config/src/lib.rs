//! Persisted preferences for dsedit.
//!
//! Preferences are process-wide: they seed new editor sessions and the
//! command line client, but the session never writes them back.
//!
//! # Location
//!
//! 1. `$DSEDIT_CONFIG`, if set
//! 2. `$XDG_CONFIG_HOME/dsedit/config.toml` (or the platform equivalent)
//!
//! A missing file yields [`Preferences::default`].
//!
//! # Format
//!
//! ```toml
//! auto_save = true
//! auto_save_interval_ms = 30000
//! font_size = 14
//! api_base = "http://localhost:5000"
//! ```

pub mod error;

use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, Result};

/// Environment variable overriding the preferences file location.
pub const CONFIG_ENV: &str = "DSEDIT_CONFIG";

/// Shortest accepted auto-save interval.
pub const MIN_AUTO_SAVE_INTERVAL_MS: u64 = 1000;

/// Accepted editor font sizes, in points.
pub const FONT_SIZE_RANGE: RangeInclusive<u16> = 8..=32;

/// Keys accepted by [`Preferences::set`].
pub const KEYS: [&str; 4] = ["auto_save", "auto_save_interval_ms", "font_size", "api_base"];

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
	/// Run the auto-save timer in new sessions.
	pub auto_save: bool,
	/// Milliseconds between auto-save attempts.
	pub auto_save_interval_ms: u64,
	/// Editor font size in points.
	pub font_size: u16,
	/// Base URL of the console API.
	pub api_base: String,
}

impl Default for Preferences {
	fn default() -> Self {
		Self {
			auto_save: true,
			auto_save_interval_ms: 30_000,
			font_size: 14,
			api_base: "http://localhost:5000".to_string(),
		}
	}
}

impl Preferences {
	/// Loads preferences from [`default_path`].
	pub fn load() -> Result<Self> {
		Self::load_from(default_path()?)
	}

	/// Loads preferences from `path`, falling back to defaults when the file
	/// does not exist.
	pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config.defaults");
				return Ok(Self::default());
			}
			Err(e) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					error: e,
				});
			}
		};
		let prefs: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
			path: path.to_path_buf(),
			error: e,
		})?;
		prefs.validate()?;
		tracing::debug!(path = %path.display(), "config.load");
		Ok(prefs)
	}

	/// Renders preferences in the file format.
	pub fn to_toml(&self) -> Result<String> {
		Ok(toml::to_string_pretty(self)?)
	}

	/// Writes preferences to `path`, creating parent directories.
	pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let content = self.to_toml()?;
		let io_err = |e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		};
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent).map_err(io_err)?;
		}
		std::fs::write(path, content).map_err(io_err)?;
		tracing::debug!(path = %path.display(), "config.save");
		Ok(())
	}

	/// Auto-save interval as a [`Duration`].
	pub fn auto_save_period(&self) -> Duration {
		Duration::from_millis(self.auto_save_interval_ms)
	}

	/// Checks every field against its accepted range.
	pub fn validate(&self) -> Result<()> {
		if self.auto_save_interval_ms < MIN_AUTO_SAVE_INTERVAL_MS {
			return Err(invalid(
				"auto_save_interval_ms",
				self.auto_save_interval_ms,
				format!("must be at least {MIN_AUTO_SAVE_INTERVAL_MS}"),
			));
		}
		if !FONT_SIZE_RANGE.contains(&self.font_size) {
			return Err(invalid(
				"font_size",
				self.font_size,
				format!("must be between {} and {}", FONT_SIZE_RANGE.start(), FONT_SIZE_RANGE.end()),
			));
		}
		if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
			return Err(invalid("api_base", &self.api_base, "must be an http(s) URL".into()));
		}
		Ok(())
	}

	/// Parses `value` into the preference named `key`.
	///
	/// Leaves `self` unchanged when the key is unknown or the value invalid.
	pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
		let mut next = self.clone();
		let value = value.trim();
		match key {
			"auto_save" => {
				next.auto_save = match value.to_ascii_lowercase().as_str() {
					"true" | "on" | "yes" | "1" => true,
					"false" | "off" | "no" | "0" => false,
					_ => return Err(invalid("auto_save", value, "expected true or false".into())),
				};
			}
			"auto_save_interval_ms" => {
				next.auto_save_interval_ms = value
					.parse()
					.map_err(|e| invalid("auto_save_interval_ms", value, format!("{e}")))?;
			}
			"font_size" => {
				next.font_size = value.parse().map_err(|e| invalid("font_size", value, format!("{e}")))?;
			}
			"api_base" => next.api_base = value.trim_end_matches('/').to_string(),
			_ => return Err(ConfigError::UnknownKey(key.to_string())),
		}
		next.validate()?;
		*self = next;
		Ok(())
	}
}

fn invalid(key: &'static str, value: impl ToString, reason: String) -> ConfigError {
	ConfigError::InvalidValue {
		key,
		value: value.to_string(),
		reason,
	}
}

/// Location of the preferences file.
pub fn default_path() -> Result<PathBuf> {
	resolve_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from), dirs::config_dir())
}

fn resolve_path(env: Option<PathBuf>, config_dir: Option<PathBuf>) -> Result<PathBuf> {
	if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
		return Ok(path);
	}
	config_dir
		.map(|dir| dir.join("dsedit").join("config.toml"))
		.ok_or(ConfigError::NoConfigDir)
}
