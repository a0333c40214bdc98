//! Scripted browser used by acquisition tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use vietstock_runtime::{Automation, BrowserContext, CookiePair, Error as RuntimeError, LaunchOptions, NavigateOptions, ObservedRequest, RequestSink, Result as RuntimeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
	Open { headless: bool },
	OnRequest,
	Navigate(String),
	Fill { selector: String, value: String },
	Click(String),
	Cookies,
	Close,
}

/// What the fake browser does when driven.
#[derive(Debug, Clone, Default)]
pub(crate) struct Script {
	/// Emitted on every navigation once a sink is registered.
	pub requests: Vec<ObservedRequest>,
	/// Emitted this long after the navigation returns.
	pub delayed: Option<(Duration, ObservedRequest)>,
	pub navigate_error: Option<String>,
	pub navigate_hangs: bool,
	pub missing_selector: Option<String>,
	pub cookies: Vec<CookiePair>,
}

#[derive(Debug, Default)]
pub(crate) struct CallLog(Mutex<Vec<Call>>);

impl CallLog {
	fn push(&self, call: Call) {
		self.0.lock().push(call);
	}

	pub(crate) fn calls(&self) -> Vec<Call> {
		self.0.lock().clone()
	}

	pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
		self.0.lock().iter().filter(|call| predicate(call)).count()
	}
}

pub(crate) struct FakeAutomation {
	pub log: Arc<CallLog>,
	script: Script,
}

impl FakeAutomation {
	pub(crate) fn new(script: Script) -> Self {
		Self {
			log: Arc::new(CallLog::default()),
			script,
		}
	}
}

#[async_trait]
impl Automation for FakeAutomation {
	async fn open_context(&self, options: &LaunchOptions) -> RuntimeResult<Box<dyn BrowserContext>> {
		self.log.push(Call::Open { headless: options.headless });
		Ok(Box::new(FakeContext {
			log: Arc::clone(&self.log),
			script: self.script.clone(),
			sink: None,
		}))
	}
}

struct FakeContext {
	log: Arc<CallLog>,
	script: Script,
	sink: Option<RequestSink>,
}

impl FakeContext {
	fn check_selector(&self, selector: &str) -> RuntimeResult<()> {
		match &self.script.missing_selector {
			Some(missing) if missing == selector => Err(RuntimeError::ElementNotFound {
				selector: selector.to_string(),
			}),
			_ => Ok(()),
		}
	}
}

#[async_trait]
impl BrowserContext for FakeContext {
	async fn on_request(&mut self, sink: RequestSink) -> RuntimeResult<()> {
		self.log.push(Call::OnRequest);
		self.sink = Some(sink);
		Ok(())
	}

	async fn navigate(&mut self, url: &str, _options: &NavigateOptions) -> RuntimeResult<()> {
		self.log.push(Call::Navigate(url.to_string()));
		if self.script.navigate_hangs {
			std::future::pending::<()>().await;
		}
		if let Some(message) = &self.script.navigate_error {
			return Err(RuntimeError::Navigation {
				url: url.to_string(),
				message: message.clone(),
			});
		}
		if let Some(sink) = &self.sink {
			for request in &self.script.requests {
				let _ = sink.send(request.clone());
			}
			if let Some((delay, request)) = self.script.delayed.clone() {
				let sink = sink.clone();
				tokio::spawn(async move {
					tokio::time::sleep(delay).await;
					let _ = sink.send(request);
				});
			}
		}
		Ok(())
	}

	async fn fill(&mut self, selector: &str, value: &str) -> RuntimeResult<()> {
		self.check_selector(selector)?;
		self.log.push(Call::Fill {
			selector: selector.to_string(),
			value: value.to_string(),
		});
		Ok(())
	}

	async fn click(&mut self, selector: &str) -> RuntimeResult<()> {
		self.check_selector(selector)?;
		self.log.push(Call::Click(selector.to_string()));
		Ok(())
	}

	async fn cookies(&mut self) -> RuntimeResult<Vec<CookiePair>> {
		self.log.push(Call::Cookies);
		Ok(self.script.cookies.clone())
	}

	async fn close(self: Box<Self>) -> RuntimeResult<()> {
		self.log.push(Call::Close);
		Ok(())
	}
}

/// A template-fetch request carrying `token`.
pub(crate) fn template_request(token: &str) -> ObservedRequest {
	ObservedRequest {
		url: "https://finance.vietstock.vn/data/GetTemplateByName".to_string(),
		method: "POST".to_string(),
		headers: [
			("User-Agent".to_string(), "Mozilla/5.0".to_string()),
			("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
		]
		.into_iter()
		.collect(),
		body: Some(format!("name=header&__RequestVerificationToken={token}&other=1")),
	}
}

/// Unrelated traffic the home page also produces.
pub(crate) fn noise_request(path: &str) -> ObservedRequest {
	ObservedRequest {
		url: format!("https://finance.vietstock.vn{path}"),
		method: "GET".to_string(),
		headers: Default::default(),
		body: None,
	}
}
