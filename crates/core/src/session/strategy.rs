//! Acquisition strategy selection and lifecycle states.

use std::fmt;

use vietstock_protocol::Credentials;

/// How a fresh session is obtained from the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy<'a> {
	/// Load the home page anonymously and sniff the token it requests with.
	Passive,
	/// Submit the login form first, then sniff the token on a fresh home load.
	Active(&'a Credentials),
}

impl<'a> Strategy<'a> {
	pub fn for_credentials(credentials: Option<&'a Credentials>) -> Self {
		match credentials {
			Some(credentials) => Strategy::Active(credentials),
			None => Strategy::Passive,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Strategy::Passive => "passive",
			Strategy::Active(_) => "active",
		}
	}
}

/// States of one `acquire` call, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireState {
	Start,
	CacheHit,
	BrowserOpen,
	LoggingIn,
	Navigating,
	AwaitingToken,
	TokenFound,
	Persist,
	Done,
	Timeout,
	Failed,
}

impl fmt::Display for AcquireState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			AcquireState::Start => "start",
			AcquireState::CacheHit => "cache_hit",
			AcquireState::BrowserOpen => "browser_open",
			AcquireState::LoggingIn => "logging_in",
			AcquireState::Navigating => "navigating",
			AcquireState::AwaitingToken => "awaiting_token",
			AcquireState::TokenFound => "token_found",
			AcquireState::Persist => "persist",
			AcquireState::Done => "done",
			AcquireState::Timeout => "timeout",
			AcquireState::Failed => "failed",
		};
		f.write_str(name)
	}
}
