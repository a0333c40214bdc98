//! Verification-token extraction from observed requests.

use std::collections::HashMap;

use url::form_urlencoded;
use vietstock_runtime::ObservedRequest;

use crate::config::ClientConfig;

/// Headers and token lifted from the template-fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
	pub url: String,
	pub headers: HashMap<String, String>,
	pub token: String,
}

/// Recognises the template-fetch request and reads the token from its body.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
	marker: String,
	field: String,
}

impl TokenMatcher {
	pub fn new(marker: impl Into<String>, field: impl Into<String>) -> Self {
		Self {
			marker: marker.into(),
			field: field.into(),
		}
	}

	pub fn from_config(config: &ClientConfig) -> Self {
		Self::new(&config.template_marker, &config.token_field)
	}

	pub fn is_template_fetch(&self, url: &str) -> bool {
		url.contains(&self.marker)
	}

	/// `None` unless the request hits the marker URL and carries a non-blank token.
	pub fn capture(&self, request: &ObservedRequest) -> Option<Capture> {
		if !self.is_template_fetch(&request.url) {
			return None;
		}
		let token = form_field(request.body.as_deref()?, &self.field)?;
		Some(Capture {
			url: request.url.clone(),
			headers: request.headers.clone(),
			token,
		})
	}
}

/// Value of `field` in a form-urlencoded body, percent-decoded.
pub fn form_field(body: &str, field: &str) -> Option<String> {
	form_urlencoded::parse(body.as_bytes())
		.find(|(key, _)| key == field)
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.trim().is_empty())
}

/// Write-once holder for the first capture seen during observation.
#[derive(Debug, Default)]
pub(crate) struct TokenSlot(Option<Capture>);

impl TokenSlot {
	/// Stores `capture` unless the slot is already filled.
	pub(crate) fn fill(&mut self, capture: Capture) -> bool {
		if self.0.is_some() {
			return false;
		}
		self.0 = Some(capture);
		true
	}

	pub(crate) fn is_filled(&self) -> bool {
		self.0.is_some()
	}

	pub(crate) fn take(self) -> Option<Capture> {
		self.0
	}
}
