//! Chrome DevTools Protocol backend.
//!
//! Each context is a dedicated browser process with one page. The CDP handler
//! runs on its own task for the lifetime of the context; request observers are
//! additional tasks that forward `Network.requestWillBeSent` events.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventRequestWillBeSent;
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, EventLoadEventFired, NavigateParams};
use chromiumoxide::element::Element;
use futures_util::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::automation::{Automation, BrowserContext, CookiePair, LaunchOptions, NavigateOptions, ObservedRequest, RequestSink, WaitUntil};
use crate::error::{Error, Result};

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches Chromium through `chromiumoxide`.
#[derive(Debug, Clone, Default)]
pub struct ChromiumAutomation {
	executable: Option<PathBuf>,
	element_timeout: Option<Duration>,
}

impl ChromiumAutomation {
	pub fn new() -> Self {
		Self::default()
	}

	/// Uses a specific Chrome/Chromium binary instead of auto-detection.
	pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
		self.executable = Some(path.into());
		self
	}

	/// How long `fill`/`click` wait for their selector to appear.
	pub fn element_timeout(mut self, timeout: Duration) -> Self {
		self.element_timeout = Some(timeout);
		self
	}
}

#[async_trait]
impl Automation for ChromiumAutomation {
	async fn open_context(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserContext>> {
		let mut builder = BrowserConfig::builder().request_timeout(options.request_timeout);
		if !options.headless {
			builder = builder.with_head();
		}
		if let Some(path) = &self.executable {
			builder = builder.chrome_executable(path);
		}
		if let Some(user_agent) = &options.user_agent {
			builder = builder.arg(format!("--user-agent={user_agent}"));
		}
		let config = builder.build().map_err(Error::LaunchFailed)?;

		let (browser, mut handler) = Browser::launch(config).await.map_err(|err| Error::LaunchFailed(err.to_string()))?;
		let handler = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if let Err(err) = event {
					debug!(target = "vietstock.chromium", error = %err, "cdp handler error");
				}
			}
		});

		let page = match browser.new_page("about:blank").await {
			Ok(page) => page,
			Err(err) => {
				let context = ChromiumContext {
					browser,
					page: None,
					handler,
					listeners: Vec::new(),
					element_timeout: Duration::ZERO,
				};
				let _ = Box::new(context).close().await;
				return Err(Error::LaunchFailed(err.to_string()));
			}
		};
		debug!(target = "vietstock.chromium", headless = options.headless, "browser context opened");

		Ok(Box::new(ChromiumContext {
			browser,
			page: Some(page),
			handler,
			listeners: Vec::new(),
			element_timeout: self.element_timeout.unwrap_or(options.request_timeout),
		}))
	}
}

struct ChromiumContext {
	browser: Browser,
	page: Option<Page>,
	handler: JoinHandle<()>,
	listeners: Vec<JoinHandle<()>>,
	element_timeout: Duration,
}

impl ChromiumContext {
	fn page(&self) -> Result<&Page> {
		self.page.as_ref().ok_or(Error::Closed)
	}

	async fn wait_for_element(&self, selector: &str) -> Result<Element> {
		let page = self.page()?;
		let deadline = Instant::now() + self.element_timeout;
		loop {
			match page.find_element(selector).await {
				Ok(element) => return Ok(element),
				Err(_) if Instant::now() < deadline => tokio::time::sleep(ELEMENT_POLL_INTERVAL).await,
				Err(_) => {
					return Err(Error::ElementNotFound {
						selector: selector.to_string(),
					});
				}
			}
		}
	}
}

#[async_trait]
impl BrowserContext for ChromiumContext {
	async fn on_request(&mut self, sink: RequestSink) -> Result<()> {
		let mut events = self.page()?.event_listener::<EventRequestWillBeSent>().await.map_err(protocol)?;
		self.listeners.push(tokio::spawn(async move {
			while let Some(event) = events.next().await {
				let request = match serde_json::to_value(&event.request) {
					Ok(raw) => observed_request(&raw),
					Err(err) => {
						warn!(target = "vietstock.chromium", error = %err, "unreadable request event");
						continue;
					}
				};
				if sink.send(request).is_err() {
					break;
				}
			}
		}));
		Ok(())
	}

	async fn navigate(&mut self, url: &str, options: &NavigateOptions) -> Result<()> {
		let page = self.page()?;
		let navigation = async {
			let mut dom_ready = page.event_listener::<EventDomContentEventFired>().await.map_err(protocol)?;
			let mut loaded = page.event_listener::<EventLoadEventFired>().await.map_err(protocol)?;

			let response = page.execute(NavigateParams::new(url)).await.map_err(|err| Error::Navigation {
				url: url.to_string(),
				message: err.to_string(),
			})?;
			if let Some(message) = response.result.error_text.clone() {
				return Err(Error::Navigation { url: url.to_string(), message });
			}

			match options.wait_until {
				WaitUntil::Commit => {}
				WaitUntil::DomContentLoaded => {
					dom_ready.next().await;
				}
				WaitUntil::Load => {
					loaded.next().await;
				}
			}
			Ok(())
		};

		match tokio::time::timeout(options.timeout, navigation).await {
			Ok(result) => result,
			Err(_) => Err(Error::NavigationTimeout {
				url: url.to_string(),
				duration_ms: options.timeout.as_millis() as u64,
			}),
		}
	}

	async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
		let element = self.wait_for_element(selector).await?;
		element.click().await.map_err(protocol)?;
		element.type_str(value).await.map_err(protocol)?;
		Ok(())
	}

	async fn click(&mut self, selector: &str) -> Result<()> {
		let element = self.wait_for_element(selector).await?;
		element.click().await.map_err(protocol)?;
		Ok(())
	}

	async fn cookies(&mut self) -> Result<Vec<CookiePair>> {
		let cookies = self.page()?.get_cookies().await.map_err(protocol)?;
		Ok(cookies
			.into_iter()
			.map(|cookie| CookiePair {
				name: cookie.name,
				value: cookie.value,
			})
			.collect())
	}

	async fn close(self: Box<Self>) -> Result<()> {
		let ChromiumContext {
			mut browser,
			page,
			handler,
			listeners,
			..
		} = *self;

		for listener in listeners {
			listener.abort();
		}
		drop(page);

		let closed = browser.close().await.map(|_| ()).map_err(protocol);
		if let Err(err) = browser.wait().await {
			warn!(target = "vietstock.chromium", error = %err, "browser process did not exit cleanly");
		}
		handler.abort();
		debug!(target = "vietstock.chromium", "browser context closed");
		closed
	}
}

fn protocol(err: impl std::fmt::Display) -> Error {
	Error::Protocol(err.to_string())
}

/// Reads a CDP `Network.Request` object.
fn observed_request(raw: &Value) -> ObservedRequest {
	let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

	let headers = raw
		.get("headers")
		.and_then(Value::as_object)
		.map(|map| {
			map.iter()
				.map(|(name, value)| {
					let value = match value {
						Value::String(s) => s.clone(),
						other => other.to_string(),
					};
					(name.clone(), value)
				})
				.collect::<HashMap<_, _>>()
		})
		.unwrap_or_default();

	let body = text("postData").or_else(|| {
		let entries = raw.get("postDataEntries")?.as_array()?;
		let mut joined = Vec::new();
		for entry in entries {
			if let Some(bytes) = entry.get("bytes").and_then(Value::as_str) {
				joined.extend(STANDARD.decode(bytes).ok()?);
			}
		}
		String::from_utf8(joined).ok()
	});

	ObservedRequest {
		url: text("url").unwrap_or_default(),
		method: text("method").unwrap_or_default(),
		headers,
		body,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn reads_inline_post_data() {
		let raw = json!({
			"url": "https://finance.vietstock.vn/data/GetTemplateByName",
			"method": "POST",
			"headers": { "User-Agent": "Mozilla/5.0", "X-Requested-With": "XMLHttpRequest" },
			"postData": "name=header&__RequestVerificationToken=abc",
		});

		let request = observed_request(&raw);
		assert_eq!(request.method, "POST");
		assert_eq!(request.header("user-agent"), Some("Mozilla/5.0"));
		assert_eq!(request.body.as_deref(), Some("name=header&__RequestVerificationToken=abc"));
	}

	#[test]
	fn falls_back_to_post_data_entries() {
		let raw = json!({
			"url": "https://finance.vietstock.vn/data/GetTemplateByName",
			"method": "POST",
			"headers": {},
			"postDataEntries": [
				{ "bytes": STANDARD.encode("__RequestVerificationToken=") },
				{ "bytes": STANDARD.encode("xyz") },
			],
		});

		assert_eq!(observed_request(&raw).body.as_deref(), Some("__RequestVerificationToken=xyz"));
	}

	#[test]
	fn get_requests_have_no_body() {
		let raw = json!({ "url": "https://finance.vietstock.vn/", "method": "GET", "headers": {} });
		assert_eq!(observed_request(&raw).body, None);
	}
}
