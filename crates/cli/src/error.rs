//! Mapping of command failures onto envelope error codes.

use serde_json::json;
use vietstock::Error;

use crate::output::{CommandError, ErrorCode};

/// Classifies `err` by the first library error in its chain.
pub fn to_command_error(err: &anyhow::Error) -> CommandError {
	let message = format!("{err:#}");
	let Some(source) = err.chain().find_map(|cause| cause.downcast_ref::<Error>()) else {
		return CommandError {
			code: ErrorCode::InternalError,
			message,
			details: None,
		};
	};

	let (code, details) = classify(source);
	let message = match code {
		ErrorCode::AuthError => format!("{message} (run `vietstock login --refresh` for a new session)"),
		ErrorCode::CacheCorrupt => format!("{message} (run `vietstock logout` to discard it)"),
		_ => message,
	};
	CommandError { code, message, details }
}

fn classify(err: &Error) -> (ErrorCode, Option<serde_json::Value>) {
	if err.is_auth_rejection() {
		return (ErrorCode::AuthError, endpoint_details(err));
	}
	let code = match err {
		Error::AcquisitionTimeout { .. } => ErrorCode::AcquisitionFailed,
		Error::NavigationFailure { .. } => ErrorCode::NavigationFailed,
		Error::Browser(_) => ErrorCode::BrowserError,
		Error::CacheCorrupt { .. } => ErrorCode::CacheCorrupt,
		Error::Http { .. } => ErrorCode::HttpError,
		Error::Decode { .. } | Error::UnexpectedResponse { .. } => ErrorCode::PortalError,
		Error::MissingSession { .. } | Error::InvalidHeader { .. } => ErrorCode::InvalidInput,
		Error::Config { .. } => ErrorCode::ConfigError,
		Error::PersistenceFailure { .. } | Error::Io(_) => ErrorCode::IoError,
		Error::Json(_) => ErrorCode::InternalError,
	};
	let details = match err {
		Error::NavigationFailure { url, .. } => Some(json!({ "url": url })),
		Error::CacheCorrupt { path, .. } | Error::Config { path, .. } | Error::PersistenceFailure { path, .. } => {
			Some(json!({ "path": path.display().to_string() }))
		}
		_ => endpoint_details(err),
	};
	(code, details)
}

fn endpoint_details(err: &Error) -> Option<serde_json::Value> {
	match err {
		Error::Http { endpoint, source } => Some(json!({
			"endpoint": endpoint,
			"status": source.status().map(|status| status.as_u16()),
		})),
		Error::Decode { endpoint, .. } | Error::UnexpectedResponse { endpoint, .. } | Error::MissingSession { endpoint } => {
			Some(json!({ "endpoint": endpoint }))
		}
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;
	use std::time::Duration;

	use anyhow::Context;

	use super::*;

	fn wrapped(err: Error) -> anyhow::Error {
		Err::<(), _>(err).context("fetching deals for FPT").unwrap_err()
	}

	#[test]
	fn acquisition_timeout_keeps_context_in_message() {
		let err = wrapped(Error::AcquisitionTimeout {
			waited: Duration::from_millis(5000),
		});
		let cmd = to_command_error(&err);
		assert_eq!(cmd.code, ErrorCode::AcquisitionFailed);
		assert_eq!(cmd.message, "fetching deals for FPT: no verification token observed within 5000ms");
	}

	#[test]
	fn navigation_failure_reports_url() {
		let err = wrapped(Error::NavigationFailure {
			url: "https://finance.vietstock.vn".into(),
			message: "timed out after 10000ms".into(),
		});
		let cmd = to_command_error(&err);
		assert_eq!(cmd.code, ErrorCode::NavigationFailed);
		assert_eq!(cmd.details.unwrap()["url"], "https://finance.vietstock.vn");
	}

	#[test]
	fn corrupt_cache_suggests_logout() {
		let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err = wrapped(Error::CacheCorrupt {
			path: PathBuf::from(".cache/login.json"),
			source,
		});
		let cmd = to_command_error(&err);
		assert_eq!(cmd.code, ErrorCode::CacheCorrupt);
		assert!(cmd.message.contains("vietstock logout"));
		assert_eq!(cmd.details.unwrap()["path"], ".cache/login.json");
	}

	#[test]
	fn undecodable_reply_reads_as_stale_session() {
		let source = serde_json::from_str::<Vec<u8>>("{}").unwrap_err();
		let err = wrapped(Error::Decode {
			endpoint: "/data/getmarketprice".into(),
			source,
		});
		let cmd = to_command_error(&err);
		assert_eq!(cmd.code, ErrorCode::AuthError);
		assert!(cmd.message.contains("login --refresh"));
		assert_eq!(cmd.details.unwrap()["endpoint"], "/data/getmarketprice");
	}

	#[test]
	fn foreign_errors_are_internal() {
		let err = anyhow::anyhow!("something else");
		let cmd = to_command_error(&err);
		assert_eq!(cmd.code, ErrorCode::InternalError);
		assert_eq!(cmd.message, "something else");
		assert!(cmd.details.is_none());
	}
}
