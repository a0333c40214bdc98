use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use vietstock_protocol::{Credentials, Session};
use vietstock_runtime::CookiePair;

use super::{SessionAcquirer, SessionStore};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::testing::{Call, CallLog, FakeAutomation, Script, noise_request, template_request};

fn config(dir: &TempDir) -> ClientConfig {
	ClientConfig {
		cache_path: dir.path().join(".cache").join("login.json"),
		observation_timeout_ms: 150,
		navigation_timeout_ms: 300,
		login_settle_ms: 0,
		..ClientConfig::default()
	}
}

fn acquirer(dir: &TempDir, script: Script) -> (SessionAcquirer<FakeAutomation>, Arc<CallLog>) {
	let automation = FakeAutomation::new(script);
	let log = Arc::clone(&automation.log);
	(SessionAcquirer::new(automation, config(dir)), log)
}

fn closes(log: &CallLog) -> usize {
	log.count(|call| *call == Call::Close)
}

#[tokio::test]
async fn cache_hit_skips_browser() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(&dir, Script::default());
	let cached = Session::new(BTreeMap::from([("Cookie".to_string(), "vts=1".to_string())]), "CACHED");
	acquirer.store().save(&cached).unwrap();

	let session = acquirer.acquire(None).await.unwrap();
	assert_eq!(session, cached);
	assert!(log.calls().is_empty());
}

#[tokio::test]
async fn passive_run_captures_token_and_caches_it() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![noise_request("/data/headernews"), template_request("ABC123")],
			..Script::default()
		},
	);

	let session = acquirer.acquire(None).await.unwrap();
	assert_eq!(session.token, "ABC123");
	assert_eq!(session.header("x-requested-with"), Some("XMLHttpRequest"));
	assert_eq!(acquirer.store().load().unwrap(), Some(session));

	assert_eq!(
		log.calls(),
		vec![
			Call::Open { headless: true },
			Call::OnRequest,
			Call::Navigate("https://finance.vietstock.vn".to_string()),
			Call::Cookies,
			Call::Close,
		]
	);
}

#[tokio::test]
async fn first_matching_request_wins() {
	let dir = TempDir::new().unwrap();
	let (acquirer, _log) = acquirer(
		&dir,
		Script {
			requests: vec![template_request("FIRST"), template_request("SECOND")],
			..Script::default()
		},
	);
	assert_eq!(acquirer.acquire(None).await.unwrap().token, "FIRST");
}

#[tokio::test]
async fn no_match_times_out_without_touching_store() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![noise_request("/"), noise_request("/data/headernews")],
			..Script::default()
		},
	);

	let err = acquirer.acquire(None).await.unwrap_err();
	assert!(err.is_acquisition_failure());
	assert!(matches!(err, Error::AcquisitionTimeout { waited } if waited == Duration::from_millis(150)));
	assert_eq!(acquirer.store().load().unwrap(), None);
	assert!(!acquirer.store().path().exists());
	assert_eq!(closes(&log), 1);
}

#[tokio::test]
async fn blank_token_is_not_a_capture() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![template_request("+"), template_request("%20%09")],
			..Script::default()
		},
	);

	let err = acquirer.acquire(None).await.unwrap_err();
	assert!(matches!(err, Error::AcquisitionTimeout { .. }));
	assert!(!acquirer.store().path().exists());
	assert_eq!(acquirer.store().load().unwrap(), None);
	assert_eq!(closes(&log), 1);
}

#[tokio::test]
async fn navigation_error_closes_browser() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			navigate_error: Some("net::ERR_NAME_NOT_RESOLVED".to_string()),
			..Script::default()
		},
	);

	match acquirer.acquire(None).await {
		Err(Error::NavigationFailure { url, message }) => {
			assert_eq!(url, "https://finance.vietstock.vn");
			assert!(message.contains("ERR_NAME_NOT_RESOLVED"), "{message}");
		}
		other => panic!("expected NavigationFailure, got {other:?}"),
	}
	assert_eq!(closes(&log), 1);
	assert_eq!(acquirer.store().load().unwrap(), None);
}

#[tokio::test]
async fn hanging_navigation_is_bounded() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			navigate_hangs: true,
			..Script::default()
		},
	);

	let started = Instant::now();
	let err = acquirer.acquire(None).await.unwrap_err();
	assert!(started.elapsed() < Duration::from_secs(5));
	assert!(matches!(err, Error::NavigationFailure { ref message, .. } if message.contains("timed out")));
	assert_eq!(closes(&log), 1);
}

#[tokio::test]
async fn token_arriving_inside_window_is_accepted() {
	let dir = TempDir::new().unwrap();
	let (acquirer, _log) = acquirer(
		&dir,
		Script {
			requests: vec![noise_request("/")],
			delayed: Some((Duration::from_millis(30), template_request("LATE"))),
			..Script::default()
		},
	);
	assert_eq!(acquirer.acquire(None).await.unwrap().token, "LATE");
}

#[tokio::test]
async fn active_strategy_logs_in_before_observing() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![template_request("AUTHED")],
			..Script::default()
		},
	);
	let credentials = Credentials::new("user@example.com", "secret");

	let session = acquirer.acquire(Some(&credentials)).await.unwrap();
	assert_eq!(session.token, "AUTHED");

	let home = "https://finance.vietstock.vn".to_string();
	assert_eq!(
		log.calls(),
		vec![
			Call::Open { headless: true },
			Call::Navigate(home.clone()),
			Call::Click("a.btnlogin".to_string()),
			Call::Fill {
				selector: "#txtEmailLogin".to_string(),
				value: "user@example.com".to_string(),
			},
			Call::Fill {
				selector: "#txtPassword".to_string(),
				value: "secret".to_string(),
			},
			Call::Click("#btnLoginAccount".to_string()),
			Call::OnRequest,
			Call::Navigate(home),
			Call::Cookies,
			Call::Close,
		]
	);
}

#[tokio::test]
async fn missing_login_form_fails_and_closes() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			missing_selector: Some("#txtEmailLogin".to_string()),
			..Script::default()
		},
	);
	let credentials = Credentials::new("user@example.com", "secret");

	let err = acquirer.acquire(Some(&credentials)).await.unwrap_err();
	assert!(matches!(err, Error::Browser(_)));
	assert!(err.is_acquisition_failure());
	assert_eq!(closes(&log), 1);
}

#[tokio::test]
async fn context_cookies_fill_in_missing_cookie_header() {
	let dir = TempDir::new().unwrap();
	let (acquirer, _log) = acquirer(
		&dir,
		Script {
			requests: vec![template_request("ABC123")],
			cookies: vec![
				CookiePair {
					name: "ASP.NET_SessionId".to_string(),
					value: "s1".to_string(),
				},
				CookiePair {
					name: "vts_usr_lg".to_string(),
					value: "u2".to_string(),
				},
			],
			..Script::default()
		},
	);

	let session = acquirer.acquire(None).await.unwrap();
	assert_eq!(session.header("cookie"), Some("ASP.NET_SessionId=s1; vts_usr_lg=u2"));
}

#[tokio::test]
async fn captured_cookie_header_is_kept() {
	let dir = TempDir::new().unwrap();
	let mut request = template_request("ABC123");
	request.headers.insert("Cookie".to_string(), "captured=1".to_string());
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![request],
			cookies: vec![CookiePair {
				name: "jar".to_string(),
				value: "2".to_string(),
			}],
			..Script::default()
		},
	);

	let session = acquirer.acquire(None).await.unwrap();
	assert_eq!(session.header("cookie"), Some("captured=1"));
	assert_eq!(log.count(|call| *call == Call::Cookies), 0);
}

#[tokio::test]
async fn unwritable_cache_still_returns_session() {
	let dir = TempDir::new().unwrap();
	let blocker = dir.path().join("blocker");
	fs::write(&blocker, "not a directory").unwrap();
	let store = SessionStore::new(blocker.join("login.json"));
	let acquirer = SessionAcquirer::with_store(
		FakeAutomation::new(Script {
			requests: vec![template_request("ABC123")],
			..Script::default()
		}),
		config(&dir),
		store,
	);

	let session = acquirer.acquire(None).await.unwrap();
	assert_eq!(session.token, "ABC123");
	assert!(matches!(
		acquirer.store().save(&session),
		Err(Error::PersistenceFailure { .. })
	));
}

#[tokio::test]
async fn refresh_ignores_cached_session() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(
		&dir,
		Script {
			requests: vec![template_request("FRESH")],
			..Script::default()
		},
	);
	acquirer
		.store()
		.save(&Session::new(BTreeMap::new(), "STALE"))
		.unwrap();

	let session = acquirer.refresh(None).await.unwrap();
	assert_eq!(session.token, "FRESH");
	assert_eq!(acquirer.store().load().unwrap().map(|s| s.token), Some("FRESH".to_string()));
	assert_eq!(closes(&log), 1);
}

#[tokio::test]
async fn corrupt_cache_is_reported() {
	let dir = TempDir::new().unwrap();
	let (acquirer, log) = acquirer(&dir, Script::default());
	let path = acquirer.store().path().to_path_buf();
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(&path, "{\"headers\": {}").unwrap();

	assert!(matches!(acquirer.acquire(None).await, Err(Error::CacheCorrupt { .. })));
	assert!(log.calls().is_empty());
}
