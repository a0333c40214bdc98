//! Bounded, time-limited memo for anonymous responses.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::MemoConfig;

#[derive(Debug)]
pub struct Memo<K, V> {
	capacity: usize,
	ttl: Duration,
	entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> Memo<K, V> {
	pub fn new(capacity: usize, ttl: Duration) -> Self {
		Self {
			capacity,
			ttl,
			entries: Mutex::new(HashMap::new()),
		}
	}

	pub fn from_config(config: &MemoConfig) -> Self {
		Self::new(config.capacity, config.ttl())
	}

	/// Value stored for `key` within the last `ttl`.
	pub fn get(&self, key: &K) -> Option<V> {
		let mut entries = self.entries.lock();
		match entries.get(key) {
			Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
			Some(_) => {
				entries.remove(key);
				None
			}
			None => None,
		}
	}

	/// Stores `value`, evicting expired entries and then the oldest one when full.
	pub fn insert(&self, key: K, value: V) {
		if self.capacity == 0 {
			return;
		}
		let ttl = self.ttl;
		let mut entries = self.entries.lock();
		entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
		if entries.len() >= self.capacity && !entries.contains_key(&key) {
			let oldest = entries
				.iter()
				.min_by_key(|(_, (stored, _))| *stored)
				.map(|(key, _)| key.clone());
			if let Some(oldest) = oldest {
				entries.remove(&oldest);
			}
		}
		entries.insert(key, (Instant::now(), value));
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn clear(&self) {
		self.entries.lock().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hit_inside_ttl() {
		let memo = Memo::new(4, Duration::from_secs(60));
		memo.insert("FPT", 1);
		assert_eq!(memo.get(&"FPT"), Some(1));
		assert_eq!(memo.get(&"VNM"), None);
	}

	#[test]
	fn expired_entries_are_dropped() {
		let memo = Memo::new(4, Duration::from_millis(20));
		memo.insert("FPT", 1);
		std::thread::sleep(Duration::from_millis(40));
		assert_eq!(memo.get(&"FPT"), None);
		assert!(memo.is_empty());
	}

	#[test]
	fn full_memo_evicts_oldest() {
		let memo = Memo::new(2, Duration::from_secs(60));
		memo.insert("a", 1);
		std::thread::sleep(Duration::from_millis(2));
		memo.insert("b", 2);
		std::thread::sleep(Duration::from_millis(2));
		memo.insert("c", 3);

		assert_eq!(memo.len(), 2);
		assert_eq!(memo.get(&"a"), None);
		assert_eq!(memo.get(&"b"), Some(2));
		assert_eq!(memo.get(&"c"), Some(3));
	}

	#[test]
	fn overwrite_does_not_evict() {
		let memo = Memo::new(2, Duration::from_secs(60));
		memo.insert("a", 1);
		memo.insert("b", 2);
		memo.insert("b", 20);
		assert_eq!(memo.get(&"a"), Some(1));
		assert_eq!(memo.get(&"b"), Some(20));
	}

	#[test]
	fn zero_capacity_stores_nothing() {
		let memo = Memo::new(0, Duration::from_secs(60));
		memo.insert("a", 1);
		assert!(memo.is_empty());
	}
}
