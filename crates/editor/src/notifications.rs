//! Notification payloads surfaced to the front end.
//!
//! Front ends own toast lifecycle and rendering; the session only decides
//! what to say and how loudly.

use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	/// Informational message (default).
	#[default]
	Info,
	/// Operation completed.
	Success,
	/// Something degraded but the session kept going.
	Warn,
	/// Operation failed.
	Error,
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Info => "info",
			Self::Success => "success",
			Self::Warn => "warn",
			Self::Error => "error",
		})
	}
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	/// Severity.
	pub level: Level,
	/// Formatted message content.
	pub message: String,
}

impl Notification {
	pub fn new(level: Level, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
		}
	}

	pub fn info(message: impl Into<String>) -> Self {
		Self::new(Level::Info, message)
	}

	pub fn success(message: impl Into<String>) -> Self {
		Self::new(Level::Success, message)
	}

	pub fn warn(message: impl Into<String>) -> Self {
		Self::new(Level::Warn, message)
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self::new(Level::Error, message)
	}
}

impl fmt::Display for Notification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] {}", self.level, self.message)
	}
}
