//! Browser-driven session acquisition.

use std::collections::BTreeMap;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};
use vietstock_protocol::{Credentials, Session};
use vietstock_runtime::{Automation, BrowserContext, CookiePair, LaunchOptions, NavigateOptions, ObservedRequest, WaitUntil};

use super::store::SessionStore;
use super::strategy::{AcquireState, Strategy};
use super::token::{Capture, TokenMatcher, TokenSlot};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Produces a usable [`Session`], from the cache when possible and from a
/// browser run otherwise.
///
/// A browser run always closes its context before returning, and only a run
/// that observed a token writes to the store.
pub struct SessionAcquirer<A> {
	automation: A,
	store: SessionStore,
	config: ClientConfig,
	matcher: TokenMatcher,
}

impl<A: Automation> SessionAcquirer<A> {
	pub fn new(automation: A, config: ClientConfig) -> Self {
		let store = SessionStore::new(config.cache_path.clone());
		Self::with_store(automation, config, store)
	}

	pub fn with_store(automation: A, config: ClientConfig, store: SessionStore) -> Self {
		let matcher = TokenMatcher::from_config(&config);
		Self {
			automation,
			store,
			config,
			matcher,
		}
	}

	pub fn store(&self) -> &SessionStore {
		&self.store
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns the cached session, or runs the browser and caches the result.
	///
	/// With `credentials` the login form is submitted before observing;
	/// without, the home page is loaded anonymously.
	pub async fn acquire(&self, credentials: Option<&Credentials>) -> Result<Session> {
		let strategy = Strategy::for_credentials(credentials);
		transition(AcquireState::Start, strategy);

		if let Some(session) = self.store.load()? {
			transition(AcquireState::CacheHit, strategy);
			info!(target = "vietstock.session", path = %self.store.path().display(), "using cached session");
			return Ok(session);
		}

		let session = self.acquire_fresh(strategy).await?;

		transition(AcquireState::Persist, strategy);
		if let Err(err) = self.store.save(&session) {
			warn!(target = "vietstock.session", error = %err, "session acquired but not cached");
		}
		transition(AcquireState::Done, strategy);
		info!(target = "vietstock.session", strategy = strategy.name(), headers = session.headers.len(), "session acquired");
		Ok(session)
	}

	/// Drops the cached session and acquires a new one.
	pub async fn refresh(&self, credentials: Option<&Credentials>) -> Result<Session> {
		self.store.clear()?;
		self.acquire(credentials).await
	}

	async fn acquire_fresh(&self, strategy: Strategy<'_>) -> Result<Session> {
		let options = LaunchOptions::new()
			.headless(self.config.headless)
			.request_timeout(self.config.navigation_timeout())
			.user_agent(self.config.user_agent.clone());
		let mut context = self.automation.open_context(&options).await.inspect_err(|err| {
			error!(target = "vietstock.session", error = %err, "browser launch failed");
		})?;
		transition(AcquireState::BrowserOpen, strategy);

		let outcome = self.drive(context.as_mut(), strategy).await;

		if let Err(err) = context.close().await {
			warn!(target = "vietstock.session", error = %err, "browser context did not close cleanly");
		}

		match &outcome {
			Ok(_) => {}
			Err(Error::AcquisitionTimeout { waited }) => {
				transition(AcquireState::Timeout, strategy);
				warn!(target = "vietstock.session", waited_ms = waited.as_millis() as u64, "no verification token observed");
			}
			Err(err) => {
				transition(AcquireState::Failed, strategy);
				debug!(target = "vietstock.session", error = %err, "acquisition failed");
			}
		}
		outcome
	}

	async fn drive(&self, context: &mut dyn BrowserContext, strategy: Strategy<'_>) -> Result<Session> {
		if let Strategy::Active(credentials) = strategy {
			transition(AcquireState::LoggingIn, strategy);
			self.submit_login(context, credentials).await?;
		}

		let capture = self.observe(context, strategy).await?;
		transition(AcquireState::TokenFound, strategy);
		debug!(target = "vietstock.session", url = %capture.url, "template fetch matched");

		let mut headers: BTreeMap<String, String> = capture.headers.into_iter().collect();
		if !headers.keys().any(|name| name.eq_ignore_ascii_case("cookie")) {
			let cookies = context.cookies().await?;
			if !cookies.is_empty() {
				headers.insert("Cookie".to_string(), cookie_header(&cookies));
			}
		}
		Ok(Session::new(headers, capture.token))
	}

	async fn submit_login(&self, context: &mut dyn BrowserContext, credentials: &Credentials) -> Result<()> {
		let selectors = &self.config.selectors;
		self.navigate(context, &self.config.home_page_url).await?;
		context.click(&selectors.login_trigger).await?;
		context.fill(&selectors.email, &credentials.username).await?;
		context.fill(&selectors.password, &credentials.password).await?;
		context.click(&selectors.submit).await?;
		tokio::time::sleep(self.config.login_settle()).await;
		Ok(())
	}

	/// Loads the home page and waits for the template fetch.
	///
	/// The window starts once navigation settles. A match seen while the
	/// navigation is still in flight ends observation early.
	async fn observe(&self, context: &mut dyn BrowserContext, strategy: Strategy<'_>) -> Result<Capture> {
		let (sink, mut requests) = mpsc::unbounded_channel();
		context.on_request(sink).await?;

		let window = self.config.observation_timeout();
		let url = self.config.home_page_url.clone();
		let mut slot = TokenSlot::default();
		{
			let watch = watch_for_token(&mut requests, &self.matcher, &mut slot);
			tokio::pin!(watch);

			transition(AcquireState::Navigating, strategy);
			let navigation = self.navigate(context, &url);
			tokio::select! {
				biased;
				() = &mut watch => {}
				navigated = navigation => {
					navigated?;
					transition(AcquireState::AwaitingToken, strategy);
					let _ = tokio::time::timeout(window, &mut watch).await;
				}
			}
		}
		slot.take().ok_or(Error::AcquisitionTimeout { waited: window })
	}

	async fn navigate(&self, context: &mut dyn BrowserContext, url: &str) -> Result<()> {
		let deadline = self.config.navigation_timeout();
		let options = NavigateOptions::new().timeout(deadline).wait_until(WaitUntil::DomContentLoaded);
		let message = match tokio::time::timeout(deadline, context.navigate(url, &options)).await {
			Ok(Ok(())) => return Ok(()),
			Ok(Err(err)) => err.to_string(),
			Err(_) => format!("timed out after {}ms", deadline.as_millis()),
		};
		error!(target = "vietstock.session", url, %message, "navigation failed");
		Err(Error::NavigationFailure {
			url: url.to_string(),
			message,
		})
	}
}

async fn watch_for_token(requests: &mut UnboundedReceiver<ObservedRequest>, matcher: &TokenMatcher, slot: &mut TokenSlot) {
	while let Some(request) = requests.recv().await {
		if let Some(capture) = matcher.capture(&request) {
			slot.fill(capture);
			return;
		}
	}
}

fn cookie_header(cookies: &[CookiePair]) -> String {
	cookies
		.iter()
		.map(|cookie| format!("{}={}", cookie.name, cookie.value))
		.collect::<Vec<_>>()
		.join("; ")
}

fn transition(state: AcquireState, strategy: Strategy<'_>) {
	debug!(target = "vietstock.session", %state, strategy = strategy.name(), "acquire");
}
