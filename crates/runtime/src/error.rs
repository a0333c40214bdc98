//! Error types for browser automation backends.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by an [`Automation`](crate::Automation) backend.
#[derive(Debug, Error)]
pub enum Error {
	/// The browser process could not be started.
	#[error("failed to launch browser: {0}")]
	LaunchFailed(String),

	/// Navigation did not reach the requested lifecycle state.
	#[error("navigation to '{url}' failed: {message}")]
	Navigation { url: String, message: String },

	/// Navigation exceeded its deadline.
	#[error("navigation timeout after {duration_ms}ms navigating to '{url}'")]
	NavigationTimeout { url: String, duration_ms: u64 },

	/// No element matched the selector before the deadline.
	#[error("element not found: {selector}")]
	ElementNotFound { selector: String },

	/// The automation protocol reported a failure.
	#[error("protocol error: {0}")]
	Protocol(String),

	/// The context was used after it was torn down.
	#[error("browser context is closed")]
	Closed,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Whether the error came from a navigation attempt.
	pub fn is_navigation(&self) -> bool {
		matches!(self, Error::Navigation { .. } | Error::NavigationTimeout { .. })
	}
}
