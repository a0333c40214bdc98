//! Client configuration.
//!
//! Every field has a default; a JSON config file only needs the keys it
//! overrides. Keys are camelCase (`homePageUrl`, `observationTimeoutMs`, ...).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_HOME_PAGE_URL: &str = "https://finance.vietstock.vn";
pub const DEFAULT_FINANCE_BASE_URL: &str = "https://finance.vietstock.vn";
pub const DEFAULT_API_BASE_URL: &str = "https://api.vietstock.vn";
pub const DEFAULT_CACHE_PATH: &str = ".cache/login.json";
/// Path fragment of the request whose body carries the verification token.
pub const DEFAULT_TEMPLATE_MARKER: &str = "data/GetTemplateByName";
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";
pub const DEFAULT_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Everything needed to acquire a session and call the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
	pub home_page_url: String,
	/// How long to keep watching requests after navigation settles.
	pub observation_timeout_ms: u64,
	pub navigation_timeout_ms: u64,
	/// Pause between submitting the login form and re-navigating.
	pub login_settle_ms: u64,
	pub headless: bool,
	pub cache_path: PathBuf,
	pub template_marker: String,
	pub token_field: String,
	pub selectors: LoginSelectors,
	pub api_base_url: String,
	pub finance_base_url: String,
	pub user_agent: String,
	pub memo: MemoConfig,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			home_page_url: DEFAULT_HOME_PAGE_URL.to_string(),
			observation_timeout_ms: 5_000,
			navigation_timeout_ms: 10_000,
			login_settle_ms: 3_000,
			headless: true,
			cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
			template_marker: DEFAULT_TEMPLATE_MARKER.to_string(),
			token_field: TOKEN_FIELD.to_string(),
			selectors: LoginSelectors::default(),
			api_base_url: DEFAULT_API_BASE_URL.to_string(),
			finance_base_url: DEFAULT_FINANCE_BASE_URL.to_string(),
			user_agent: DEFAULT_USER_AGENT.to_string(),
			memo: MemoConfig::default(),
		}
	}
}

impl ClientConfig {
	/// Reads a config file, falling back to defaults when it does not exist.
	pub fn load(path: &Path) -> Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
			Err(err) => return Err(err.into()),
		};
		serde_json::from_str(&content).map_err(|source| Error::Config {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn observation_timeout(&self) -> Duration {
		Duration::from_millis(self.observation_timeout_ms)
	}

	pub fn navigation_timeout(&self) -> Duration {
		Duration::from_millis(self.navigation_timeout_ms)
	}

	pub fn login_settle(&self) -> Duration {
		Duration::from_millis(self.login_settle_ms)
	}
}

/// CSS selectors driving the form login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginSelectors {
	pub login_trigger: String,
	pub email: String,
	pub password: String,
	pub submit: String,
}

impl Default for LoginSelectors {
	fn default() -> Self {
		Self {
			login_trigger: "a.btnlogin".to_string(),
			email: "#txtEmailLogin".to_string(),
			password: "#txtPassword".to_string(),
			submit: "#btnLoginAccount".to_string(),
		}
	}
}

/// Bounds of the short-lived response memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoConfig {
	pub capacity: usize,
	pub ttl_ms: u64,
}

impl Default for MemoConfig {
	fn default() -> Self {
		Self {
			capacity: 2048,
			ttl_ms: 10_000,
		}
	}
}

impl MemoConfig {
	pub fn ttl(&self) -> Duration {
		Duration::from_millis(self.ttl_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_file_yields_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = ClientConfig::load(&dir.path().join("absent.json")).unwrap();
		assert_eq!(config, ClientConfig::default());
		assert_eq!(config.observation_timeout(), Duration::from_secs(5));
		assert_eq!(config.cache_path, PathBuf::from(".cache/login.json"));
	}

	#[test]
	fn partial_file_overrides_only_named_keys() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vietstock.json");
		fs::write(
			&path,
			r##"{"homePageUrl": "http://127.0.0.1:9000", "observationTimeoutMs": 250, "headless": false, "selectors": {"email": "#user"}}"##,
		)
		.unwrap();

		let config = ClientConfig::load(&path).unwrap();
		assert_eq!(config.home_page_url, "http://127.0.0.1:9000");
		assert_eq!(config.observation_timeout(), Duration::from_millis(250));
		assert!(!config.headless);
		assert_eq!(config.selectors.email, "#user");
		assert_eq!(config.selectors.password, "#txtPassword");
		assert_eq!(config.token_field, TOKEN_FIELD);
	}

	#[test]
	fn malformed_file_is_a_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vietstock.json");
		fs::write(&path, "{ not json").unwrap();
		assert!(matches!(ClientConfig::load(&path), Err(Error::Config { .. })));
	}
}
