//! Error types for session handling and portal calls.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The cache file exists but does not hold a complete session.
	#[error("session cache {} is corrupt", path.display())]
	CacheCorrupt {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// No verification token was observed before the window closed.
	#[error("no verification token observed within {}ms", waited.as_millis())]
	AcquisitionTimeout { waited: Duration },

	#[error("navigation to {url} failed: {message}")]
	NavigationFailure { url: String, message: String },

	#[error("failed to persist session to {}", path.display())]
	PersistenceFailure {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("browser automation failed: {0}")]
	Browser(#[from] vietstock_runtime::Error),

	#[error("request to {endpoint} failed")]
	Http {
		endpoint: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("could not decode response from {endpoint}")]
	Decode {
		endpoint: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("unexpected response from {endpoint}: {message}")]
	UnexpectedResponse { endpoint: String, message: String },

	#[error("{endpoint} needs a session")]
	MissingSession { endpoint: String },

	#[error("session header {name} cannot be replayed")]
	InvalidHeader { name: String },

	#[error("invalid config {}", path.display())]
	Config {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Whether the browser run failed to yield a session.
	///
	/// Both a closed observation window and a failed navigation count; neither
	/// leaves anything behind in the store.
	pub fn is_acquisition_failure(&self) -> bool {
		matches!(self, Error::AcquisitionTimeout { .. } | Error::NavigationFailure { .. } | Error::Browser(_))
	}

	/// Whether the portal rejected the request in a way that suggests the
	/// cached session went stale.
	pub fn is_auth_rejection(&self) -> bool {
		match self {
			Error::Http { source, .. } => source
				.status()
				.is_some_and(|status| matches!(status.as_u16(), 400 | 401 | 403)),
			Error::Decode { .. } => true,
			_ => false,
		}
	}
}
