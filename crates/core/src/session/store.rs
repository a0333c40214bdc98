//! Single-file session cache.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;
use vietstock_protocol::Session;

use crate::error::{Error, Result};

/// Durable home of at most one [`Session`].
///
/// Saves go through a sibling temp file that is synced and renamed over the
/// cache file, so readers see either the previous session or the new one.
#[derive(Debug)]
pub struct SessionStore {
	path: PathBuf,
	write_lock: Mutex<()>,
}

impl SessionStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			write_lock: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Returns the cached session, `None` when nothing was saved yet.
	///
	/// A file that exists but does not decode to a complete session is
	/// reported as [`Error::CacheCorrupt`].
	pub fn load(&self) -> Result<Option<Session>> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => return Ok(None),
			Err(err) => return Err(err.into()),
		};
		serde_json::from_str(&content).map(Some).map_err(|source| Error::CacheCorrupt {
			path: self.path.clone(),
			source,
		})
	}

	/// Replaces the cached session.
	pub fn save(&self, session: &Session) -> Result<()> {
		let _guard = self.write_lock.lock();
		let failure = |source: io::Error| Error::PersistenceFailure {
			path: self.path.clone(),
			source,
		};

		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		fs::create_dir_all(dir).map_err(failure)?;

		let json = serde_json::to_vec_pretty(session)?;
		let mut tmp = tempfile::Builder::new()
			.prefix(".session-")
			.suffix(".tmp")
			.tempfile_in(dir)
			.map_err(failure)?;
		tmp.write_all(&json).map_err(failure)?;
		tmp.as_file().sync_all().map_err(failure)?;
		tmp.persist(&self.path).map_err(|err| failure(err.error))?;

		debug!(target = "vietstock.store", path = %self.path.display(), headers = session.headers.len(), "session saved");
		Ok(())
	}

	/// Deletes the cache file. Returns whether there was one.
	pub fn clear(&self) -> Result<bool> {
		let _guard = self.write_lock.lock();
		match fs::remove_file(&self.path) {
			Ok(()) => {
				debug!(target = "vietstock.store", path = %self.path.display(), "session cleared");
				Ok(true)
			}
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;
	use std::sync::Arc;

	use tempfile::TempDir;

	use super::*;

	fn session(token: &str) -> Session {
		Session::new(
			BTreeMap::from([
				("Cookie".to_string(), format!("ASP.NET_SessionId={token}")),
				("User-Agent".to_string(), "Mozilla/5.0".to_string()),
			]),
			token,
		)
	}

	fn store_in(dir: &TempDir) -> SessionStore {
		SessionStore::new(dir.path().join(".cache").join("login.json"))
	}

	#[test]
	fn load_without_file_is_none() {
		let dir = TempDir::new().unwrap();
		assert_eq!(store_in(&dir).load().unwrap(), None);
	}

	#[test]
	fn cache_under_a_regular_file_is_absent() {
		let dir = TempDir::new().unwrap();
		let blocker = dir.path().join("blocker");
		std::fs::write(&blocker, "not a directory").unwrap();
		let store = SessionStore::new(blocker.join("login.json"));
		assert_eq!(store.load().unwrap(), None);
		assert!(matches!(store.save(&session("A")), Err(Error::PersistenceFailure { .. })));
	}

	#[test]
	fn save_then_load_round_trips() {
		let dir = TempDir::new().unwrap();
		let store = store_in(&dir);
		let saved = session("ABC123");

		store.save(&saved).unwrap();
		assert_eq!(store.load().unwrap(), Some(saved.clone()));

		let replaced = session("XYZ");
		store.save(&replaced).unwrap();
		assert_eq!(store.load().unwrap(), Some(replaced));
	}

	#[test]
	fn malformed_file_is_corrupt_not_absent() {
		let dir = TempDir::new().unwrap();
		let store = store_in(&dir);
		fs::create_dir_all(store.path().parent().unwrap()).unwrap();

		for content in ["", "{\"headers\": {\"a\": \"b\"}, \"tok", "{\"headers\": null, \"token\": null}", "[]"] {
			fs::write(store.path(), content).unwrap();
			match store.load() {
				Err(Error::CacheCorrupt { path, .. }) => assert_eq!(path, store.path()),
				other => panic!("expected CacheCorrupt for {content:?}, got {other:?}"),
			}
		}
	}

	#[test]
	fn interrupted_save_leaves_previous_session() {
		let dir = TempDir::new().unwrap();
		let store = store_in(&dir);
		let saved = session("first");
		store.save(&saved).unwrap();

		// A writer that died mid-write leaves only its temp file behind.
		let stray = store.path().parent().unwrap().join(".session-dead.tmp");
		fs::write(&stray, "{\"headers\": {\"Cookie\": \"x\"}").unwrap();

		assert_eq!(store.load().unwrap(), Some(saved));
	}

	#[test]
	fn save_leaves_no_temp_files() {
		let dir = TempDir::new().unwrap();
		let store = store_in(&dir);
		store.save(&session("a")).unwrap();
		store.save(&session("b")).unwrap();

		let entries: Vec<_> = fs::read_dir(store.path().parent().unwrap())
			.unwrap()
			.map(|entry| entry.unwrap().file_name())
			.collect();
		assert_eq!(entries, vec![std::ffi::OsString::from("login.json")]);
	}

	#[test]
	fn concurrent_saves_never_expose_partial_sessions() {
		let dir = TempDir::new().unwrap();
		let store = Arc::new(store_in(&dir));
		let first = session("first");
		let second = session("second");
		store.save(&first).unwrap();

		std::thread::scope(|scope| {
			for candidate in [&first, &second] {
				let store = Arc::clone(&store);
				scope.spawn(move || {
					for _ in 0..50 {
						store.save(candidate).unwrap();
					}
				});
			}
			let reader = Arc::clone(&store);
			let (first, second) = (&first, &second);
			scope.spawn(move || {
				for _ in 0..200 {
					let loaded = reader.load().unwrap().unwrap();
					assert!(&loaded == first || &loaded == second, "unexpected session {loaded:?}");
				}
			});
		});
	}

	#[test]
	fn clear_removes_cache() {
		let dir = TempDir::new().unwrap();
		let store = store_in(&dir);
		assert!(!store.clear().unwrap());
		store.save(&session("a")).unwrap();
		assert!(store.clear().unwrap());
		assert_eq!(store.load().unwrap(), None);
	}
}
