//! The browser capability consumed by session acquisition.
//!
//! Backends expose a small surface: open an isolated context, navigate,
//! interact with elements by selector, and report every outgoing request.
//! Requests are pushed into a [`RequestSink`] from the backend's own task; the
//! consumer decides what a match looks like.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

/// Channel end a backend pushes observed requests into.
pub type RequestSink = mpsc::UnboundedSender<ObservedRequest>;

/// An outgoing request as seen by the browser, before it hits the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRequest {
	pub url: String,
	pub method: String,
	pub headers: HashMap<String, String>,
	/// Raw request body, when the browser exposes one.
	pub body: Option<String>,
}

impl ObservedRequest {
	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// A cookie from the context's jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePair {
	pub name: String,
	pub value: String,
}

/// Options applied when a browser context is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
	pub headless: bool,
	/// Per-command protocol deadline.
	pub request_timeout: Duration,
	pub user_agent: Option<String>,
}

impl LaunchOptions {
	pub fn new() -> Self {
		Self {
			headless: true,
			request_timeout: Duration::from_secs(30),
			user_agent: None,
		}
	}

	pub fn headless(mut self, headless: bool) -> Self {
		self.headless = headless;
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self::new()
	}
}

/// When to consider a navigation finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
	/// The `load` event fired.
	Load,
	/// The `DOMContentLoaded` event fired.
	#[default]
	DomContentLoaded,
	/// The navigation was committed; nothing is awaited past that.
	Commit,
}

/// Options for [`BrowserContext::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateOptions {
	pub timeout: Duration,
	pub wait_until: WaitUntil,
}

impl NavigateOptions {
	pub fn new() -> Self {
		Self {
			timeout: Duration::from_secs(10),
			wait_until: WaitUntil::default(),
		}
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
		self.wait_until = wait_until;
		self
	}
}

impl Default for NavigateOptions {
	fn default() -> Self {
		Self::new()
	}
}

/// Launches isolated browser contexts.
#[async_trait]
pub trait Automation: Send + Sync {
	async fn open_context(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserContext>>;
}

/// One live browser context and its single page.
///
/// `close` consumes the context, so teardown happens at most once per value.
#[async_trait]
pub trait BrowserContext: Send {
	/// Starts forwarding every outgoing request into `sink`.
	///
	/// Only requests issued after registration are delivered.
	async fn on_request(&mut self, sink: RequestSink) -> Result<()>;

	async fn navigate(&mut self, url: &str, options: &NavigateOptions) -> Result<()>;

	/// Types `value` into the element matched by `selector`.
	async fn fill(&mut self, selector: &str, value: &str) -> Result<()>;

	async fn click(&mut self, selector: &str) -> Result<()>;

	/// Cookies currently held by the context.
	async fn cookies(&mut self) -> Result<Vec<CookiePair>> {
		Ok(Vec::new())
	}

	async fn close(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let request = ObservedRequest {
			url: "https://finance.vietstock.vn/data/GetTemplateByName".into(),
			method: "POST".into(),
			headers: HashMap::from([("Cookie".to_string(), "a=1".to_string())]),
			body: None,
		};
		assert_eq!(request.header("cookie"), Some("a=1"));
		assert_eq!(request.header("user-agent"), None);
	}

	#[test]
	fn navigate_options_builder() {
		let options = NavigateOptions::new().timeout(Duration::from_millis(250)).wait_until(WaitUntil::Commit);
		assert_eq!(options.timeout, Duration::from_millis(250));
		assert_eq!(options.wait_until, WaitUntil::Commit);
		assert_eq!(NavigateOptions::default().wait_until, WaitUntil::DomContentLoaded);
	}

	#[test]
	fn launch_defaults_to_headless() {
		assert!(LaunchOptions::default().headless);
		assert!(!LaunchOptions::new().headless(false).headless);
	}
}
