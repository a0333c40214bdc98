//! Typed access to the portal's JSON endpoints.
//!
//! Authenticated calls replay the session headers and carry the verification
//! token in the form body. Price history comes from the public chart API and
//! needs no session.

mod company;
mod finance;
mod market;
mod memo;
mod news;


use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use vietstock_protocol::{HistoricalBar, Resolution, Session};

pub use company::{EventQuery, TransferQuery};
pub use memo::Memo;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Session headers that describe the captured request itself.
const UNREPLAYED_HEADERS: &[&str] = &["host", "content-length", "accept-encoding", "connection"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistoryKey {
	symbol: String,
	resolution: Resolution,
	from: i64,
	to: i64,
}

/// Client for `finance.vietstock.vn`, usually bound to one [`Session`].
pub struct VietstockClient {
	http: reqwest::Client,
	config: ClientConfig,
	session: Option<Session>,
	headers: HeaderMap,
	history: Memo<HistoryKey, Vec<HistoricalBar>>,
}

impl VietstockClient {
	pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
		let headers = replay_headers(&session)?;
		Self::build(config, Some(session), headers)
	}

	/// A client without a session. Only [`historical_data`](Self::historical_data)
	/// works; authenticated calls fail with [`Error::MissingSession`].
	pub fn anonymous(config: ClientConfig) -> Result<Self> {
		Self::build(config, None, HeaderMap::new())
	}

	fn build(config: ClientConfig, session: Option<Session>, headers: HeaderMap) -> Result<Self> {
		let http = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|source| Error::Http {
				endpoint: "client".to_string(),
				source,
			})?;
		let history = Memo::from_config(&config.memo);
		Ok(Self {
			http,
			config,
			session,
			headers,
			history,
		})
	}

	pub fn session(&self) -> Option<&Session> {
		self.session.as_ref()
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn finance_url(&self, path: &str) -> String {
		format!("{}{}", self.config.finance_base_url.trim_end_matches('/'), path)
	}

	fn api_url(&self, path: &str) -> String {
		format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
	}

	/// POSTs `form` plus the verification token and decodes the JSON reply.
	async fn post<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
		self.post_with_query(path, &[], form).await
	}

	async fn post_with_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)], form: Form) -> Result<T> {
		let session = self.session.as_ref().ok_or_else(|| Error::MissingSession {
			endpoint: path.to_string(),
		})?;
		let body = form.field(&self.config.token_field, &session.token).into_pairs();
		let request = self
			.http
			.post(self.finance_url(path))
			.headers(self.headers.clone())
			.query(query)
			.form(&body);
		self.send(path, request).await
	}

	async fn get_anonymous<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
		let request = self
			.http
			.get(self.api_url(path))
			.headers(api_headers(&self.config.user_agent))
			.query(query);
		self.send(path, request).await
	}

	async fn send<T: DeserializeOwned>(&self, path: &str, request: reqwest::RequestBuilder) -> Result<T> {
		let started = Instant::now();
		let http_error = |source| Error::Http {
			endpoint: path.to_string(),
			source,
		};

		let response = request.send().await.map_err(http_error)?;
		let status = response.status();
		if !status.is_success() {
			warn!(target = "vietstock.client", endpoint = path, status = status.as_u16(), "portal rejected request");
		}
		let bytes = response.error_for_status().map_err(http_error)?.bytes().await.map_err(http_error)?;
		debug!(
			target = "vietstock.client",
			endpoint = path,
			status = status.as_u16(),
			bytes = bytes.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"portal reply"
		);
		serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
			endpoint: path.to_string(),
			source,
		})
	}
}

/// Form body under construction. The token is appended when sent.
#[derive(Debug, Clone, Default)]
pub(crate) struct Form(Vec<(String, String)>);

impl Form {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn field(mut self, name: &str, value: impl ToString) -> Self {
		self.0.push((name.to_string(), value.to_string()));
		self
	}

	/// Repeats `name` once per value, as `name=a&name=b`.
	pub(crate) fn repeated<V: ToString>(mut self, name: &str, values: impl IntoIterator<Item = V>) -> Self {
		for value in values {
			self.0.push((name.to_string(), value.to_string()));
		}
		self
	}

	fn into_pairs(self) -> Vec<(String, String)> {
		self.0
	}
}

/// Session headers as a replayable [`HeaderMap`].
fn replay_headers(session: &Session) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	for (name, value) in &session.headers {
		if name.starts_with(':') || UNREPLAYED_HEADERS.iter().any(|skip| name.eq_ignore_ascii_case(skip)) {
			continue;
		}
		let invalid = || Error::InvalidHeader { name: name.clone() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
		headers.insert(header_name, header_value);
	}
	Ok(headers)
}

/// Headers the public chart API expects from its own front end.
fn api_headers(user_agent: &str) -> HeaderMap {
	let mut headers = HeaderMap::new();
	headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));
	headers.insert(reqwest::header::ACCEPT_LANGUAGE, HeaderValue::from_static("vi-VN,vi;q=0.9,en;q=0.8"));
	headers.insert(reqwest::header::ORIGIN, HeaderValue::from_static("https://stockchart.vietstock.vn"));
	headers.insert(reqwest::header::REFERER, HeaderValue::from_static("https://stockchart.vietstock.vn/"));
	if let Ok(value) = HeaderValue::from_str(user_agent) {
		headers.insert(reqwest::header::USER_AGENT, value);
	}
	headers
}

/// Rows of the first group in a `[[rows...], [meta...]]` reply.
fn first_group<T: DeserializeOwned>(endpoint: &str, reply: Value) -> Result<Vec<T>> {
	let rows = match reply {
		Value::Array(mut groups) if !groups.is_empty() => groups.swap_remove(0),
		Value::Array(_) | Value::Null => return Ok(Vec::new()),
		other => {
			return Err(Error::UnexpectedResponse {
				endpoint: endpoint.to_string(),
				message: format!("expected grouped rows, got {}", json_kind(&other)),
			});
		}
	};
	serde_json::from_value(rows).map_err(|source| Error::Decode {
		endpoint: endpoint.to_string(),
		source,
	})
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
