use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use vietstock::{ClientConfig, Credentials, SessionAcquirer, SessionStore};
use vietstock_runtime::ChromiumAutomation;

use super::records;
use crate::output::{DiagnosticLevel, ResultBuilder};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
	cache_path: String,
	/// Header names only; values carry cookies.
	headers: Vec<String>,
	token_length: usize,
	reused: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutData {
	cache_path: String,
	removed: bool,
}

pub(super) fn acquirer(config: &ClientConfig, chrome: Option<&Path>) -> SessionAcquirer<ChromiumAutomation> {
	let mut automation = ChromiumAutomation::new().element_timeout(config.navigation_timeout());
	if let Some(chrome) = chrome {
		automation = automation.executable(chrome);
	}
	SessionAcquirer::new(automation, config.clone())
}

pub(super) async fn login(acquirer: &SessionAcquirer<ChromiumAutomation>, credentials: Option<&Credentials>, refresh: bool) -> Result<ResultBuilder<Value>> {
	let reused = !refresh && acquirer.store().load().context("reading session cache")?.is_some();
	let session = if refresh {
		acquirer.refresh(credentials).await
	} else {
		acquirer.acquire(credentials).await
	}
	.context("acquiring portal session")?;

	let data = LoginData {
		cache_path: acquirer.store().path().display().to_string(),
		headers: session.headers.keys().cloned().collect(),
		token_length: session.token.len(),
		reused,
	};
	let mut builder = records("login", None, data)?;
	if reused {
		builder = builder.diagnostic_with_source(DiagnosticLevel::Info, "reused cached session; pass --refresh to replace it", "session");
	}
	Ok(builder)
}

pub(super) fn logout(config: &ClientConfig) -> Result<ResultBuilder<Value>> {
	let store = SessionStore::new(config.cache_path.clone());
	let removed = store.clear().context("removing session cache")?;
	info!(target = "vietstock.session", path = %store.path().display(), removed, "logout");
	records(
		"logout",
		None,
		LogoutData {
			cache_path: store.path().display().to_string(),
			removed,
		},
	)
}
