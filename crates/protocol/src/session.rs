//! Authenticated session material.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Headers and verification token harvested from a browser run.
///
/// Both fields are always present. Absence of a session is modelled as
/// `Option<Session>`, never as an empty token or header map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionFile")]
pub struct Session {
	pub headers: BTreeMap<String, String>,
	pub token: String,
}

impl Session {
	pub fn new(headers: BTreeMap<String, String>, token: impl Into<String>) -> Self {
		Self {
			headers,
			token: token.into(),
		}
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// On-disk shape, validated into [`Session`].
#[derive(Deserialize)]
struct SessionFile {
	headers: BTreeMap<String, String>,
	token: String,
}

impl TryFrom<SessionFile> for Session {
	type Error = &'static str;

	fn try_from(file: SessionFile) -> Result<Self, Self::Error> {
		if file.token.trim().is_empty() {
			return Err("session token is empty");
		}
		Ok(Session {
			headers: file.headers,
			token: file.token,
		})
	}
}

/// Portal account used by the form-login strategy.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn session_json_shape() {
		let session = Session::new(BTreeMap::from([("Cookie".to_string(), "ASP.NET_SessionId=x".to_string())]), "tok");
		let json = serde_json::to_value(&session).unwrap();
		assert_eq!(json, serde_json::json!({ "headers": { "Cookie": "ASP.NET_SessionId=x" }, "token": "tok" }));

		let back: Session = serde_json::from_value(json).unwrap();
		assert_eq!(back, session);
		assert_eq!(back.header("cookie"), Some("ASP.NET_SessionId=x"));
	}

	#[test]
	fn half_populated_sessions_are_rejected() {
		for raw in [
			r#"{"headers": null, "token": null}"#,
			r#"{"headers": {"a": "b"}}"#,
			r#"{"token": "abc"}"#,
			r#"{"headers": {"a": "b"}, "token": ""}"#,
		] {
			assert!(serde_json::from_str::<Session>(raw).is_err(), "{raw} should not decode");
		}
	}

	#[test]
	fn credentials_debug_hides_password() {
		let creds = Credentials::new("user@example.com", "secret");
		let debug = format!("{creds:?}");
		assert!(debug.contains("user@example.com"));
		assert!(!debug.contains("secret"));
	}
}
