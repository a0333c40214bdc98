//! Effective client configuration: optional JSON file, then command-line overrides.

use std::path::Path;

use anyhow::{Result, bail};
use vietstock::{ClientConfig, Credentials};

use crate::cli::GlobalArgs;
use crate::output::EffectiveConfig;

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vietstock.json";

pub fn load_config(args: &GlobalArgs) -> Result<ClientConfig> {
	let mut config = match args.config {
		Some(ref path) => {
			if !path.exists() {
				bail!("config file {} not found", path.display());
			}
			ClientConfig::load(path)?
		}
		None => ClientConfig::load(Path::new(DEFAULT_CONFIG_FILE))?,
	};
	apply_overrides(&mut config, args);
	Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, args: &GlobalArgs) {
	if let Some(ref cache) = args.cache {
		config.cache_path = cache.clone();
	}
	if args.headful {
		config.headless = false;
	}
}

/// Credentials for the form login, when both halves were supplied.
pub fn credentials(args: &GlobalArgs) -> Option<Credentials> {
	match (&args.username, &args.password) {
		(Some(username), Some(password)) if !username.is_empty() => Some(Credentials::new(username, password)),
		_ => None,
	}
}

pub fn effective(config: &ClientConfig, strategy: Option<&str>) -> EffectiveConfig {
	EffectiveConfig {
		cache_path: config.cache_path.clone(),
		headless: config.headless,
		strategy: strategy.map(str::to_string),
	}
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::path::PathBuf;

	use tempfile::TempDir;

	use super::*;

	#[test]
	fn flags_override_file_values() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("vietstock.json");
		fs::write(&path, r#"{ "cachePath": "from-file.json", "observationTimeoutMs": 1500 }"#).unwrap();

		let args = GlobalArgs {
			config: Some(path),
			cache: Some(PathBuf::from("from-flag.json")),
			headful: true,
			..GlobalArgs::default()
		};
		let config = load_config(&args).unwrap();

		assert_eq!(config.cache_path, PathBuf::from("from-flag.json"));
		assert_eq!(config.observation_timeout_ms, 1500);
		assert!(!config.headless);
	}

	#[test]
	fn file_values_survive_without_flags() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("vietstock.json");
		fs::write(&path, r#"{ "cachePath": "from-file.json", "headless": false }"#).unwrap();

		let args = GlobalArgs {
			config: Some(path),
			..GlobalArgs::default()
		};
		let config = load_config(&args).unwrap();

		assert_eq!(config.cache_path, PathBuf::from("from-file.json"));
		assert!(!config.headless);
		assert_eq!(config.home_page_url, ClientConfig::default().home_page_url);
	}

	#[test]
	fn explicit_missing_config_is_an_error() {
		let dir = TempDir::new().unwrap();
		let args = GlobalArgs {
			config: Some(dir.path().join("absent.json")),
			..GlobalArgs::default()
		};
		let err = load_config(&args).unwrap_err();
		assert!(err.to_string().contains("not found"));
	}

	#[test]
	fn malformed_config_is_reported() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("vietstock.json");
		fs::write(&path, "{ not json").unwrap();

		let args = GlobalArgs {
			config: Some(path),
			..GlobalArgs::default()
		};
		let err = load_config(&args).unwrap_err();
		assert!(matches!(err.downcast_ref::<vietstock::Error>(), Some(vietstock::Error::Config { .. })));
	}

	#[test]
	fn credentials_need_both_halves() {
		let mut args = GlobalArgs {
			username: Some("user@example.com".into()),
			..GlobalArgs::default()
		};
		assert!(credentials(&args).is_none());

		args.password = Some("secret".into());
		let creds = credentials(&args).unwrap();
		assert_eq!(creds.username, "user@example.com");
		assert_eq!(creds.password, "secret");

		args.username = Some(String::new());
		assert!(credentials(&args).is_none());
	}
}
