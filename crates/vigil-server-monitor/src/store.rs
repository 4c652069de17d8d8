// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cached source map store shared across concurrent request tasks.
//!
//! One entry per bundle base name, loaded on first request and kept for
//! the process lifetime. Absent, unreadable, and corrupt map files all
//! populate a negative entry, so repeated reports referencing the same
//! bad map never touch the filesystem again. Concurrent first requests
//! for one name coalesce into a single load.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use vigil_monitor_symbolicate::SourceMap;

/// File-reading collaborator the store resolves map files against.
#[async_trait]
pub trait MapSource: Send + Sync {
	/// Read the raw bytes of a map file; `Ok(None)` when it does not exist.
	async fn load(&self, file_name: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Production map source: a flat directory of `<bundle>.map` files.
#[derive(Debug, Clone)]
pub struct DirectoryMaps {
	dir: PathBuf,
}

impl DirectoryMaps {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
}

#[async_trait]
impl MapSource for DirectoryMaps {
	async fn load(&self, file_name: &str) -> io::Result<Option<Vec<u8>>> {
		match tokio::fs::read(self.dir.join(file_name)).await {
			Ok(bytes) => Ok(Some(bytes)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e),
		}
	}
}

/// Cached outcome of loading one bundle's source map.
///
/// Entries are immutable once populated; only the store's key space grows.
#[derive(Debug, Clone)]
pub enum MapEntry {
	/// Parsed and ready for lookups.
	Loaded(Arc<SourceMap>),
	/// No usable map: absent, unreadable, or corrupt. Never retried.
	Missing,
}

/// Lazily loaded, cached source map consumers keyed by bundle base name.
///
/// The write lock is held only to install a key's cell; the load itself
/// runs inside the cell, so requests for different names never block each
/// other and concurrent first requests for one name share one load.
// TODO: entries accumulate for the process lifetime; bound the cache once
// an eviction policy (capacity or TTL) is agreed.
pub struct SourceMapStore<S> {
	source: S,
	entries: RwLock<HashMap<String, Arc<OnceCell<MapEntry>>>>,
}

impl<S: MapSource> SourceMapStore<S> {
	pub fn new(source: S) -> Self {
		Self {
			source,
			entries: RwLock::new(HashMap::new()),
		}
	}

	/// The entry for a bundle base name, loading it on first request.
	pub async fn entry(&self, base_name: &str) -> MapEntry {
		let cell = {
			let entries = self.entries.read().await;
			entries.get(base_name).cloned()
		};

		let cell = match cell {
			Some(cell) => cell,
			None => {
				let mut entries = self.entries.write().await;
				entries.entry(base_name.to_string()).or_default().clone()
			}
		};

		cell.get_or_init(|| self.load_entry(base_name)).await.clone()
	}

	async fn load_entry(&self, base_name: &str) -> MapEntry {
		let map_file = format!("{base_name}.map");

		let bytes = match self.source.load(&map_file).await {
			Ok(Some(bytes)) => bytes,
			Ok(None) => {
				debug!(map_file = %map_file, "no source map for bundle");
				return MapEntry::Missing;
			}
			Err(e) => {
				warn!(map_file = %map_file, error = %e, "failed to read source map");
				return MapEntry::Missing;
			}
		};

		match SourceMap::from_slice(&bytes) {
			Ok(map) => {
				debug!(
					map_file = %map_file,
					mappings = map.mapping_count(),
					"loaded source map"
				);
				MapEntry::Loaded(Arc::new(map))
			}
			Err(e) => {
				warn!(map_file = %map_file, error = %e, "failed to parse source map");
				MapEntry::Missing
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	const SAMPLE_MAP: &str = r#"{
		"version": 3,
		"sources": ["src/app.ts"],
		"names": [],
		"mappings": "AAAA"
	}"#;

	/// Map source that counts loads and can delay to widen race windows.
	struct CountingSource {
		maps: HashMap<String, Vec<u8>>,
		loads: Arc<AtomicUsize>,
		delay: Duration,
	}

	impl CountingSource {
		fn new(maps: HashMap<String, Vec<u8>>) -> (Self, Arc<AtomicUsize>) {
			let loads = Arc::new(AtomicUsize::new(0));
			(
				Self {
					maps,
					loads: Arc::clone(&loads),
					delay: Duration::from_millis(20),
				},
				loads,
			)
		}
	}

	#[async_trait]
	impl MapSource for CountingSource {
		async fn load(&self, file_name: &str) -> io::Result<Option<Vec<u8>>> {
			self.loads.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(self.delay).await;
			Ok(self.maps.get(file_name).cloned())
		}
	}

	fn single_map_source() -> (CountingSource, Arc<AtomicUsize>) {
		let mut maps = HashMap::new();
		maps.insert("bundle.js.map".to_string(), SAMPLE_MAP.as_bytes().to_vec());
		CountingSource::new(maps)
	}

	#[tokio::test]
	async fn loads_and_caches_present_map() {
		let (source, loads) = single_map_source();
		let store = SourceMapStore::new(source);

		assert!(matches!(store.entry("bundle.js").await, MapEntry::Loaded(_)));
		assert!(matches!(store.entry("bundle.js").await, MapEntry::Loaded(_)));
		assert_eq!(loads.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn absent_map_is_negatively_cached() {
		let (source, loads) = CountingSource::new(HashMap::new());
		let store = SourceMapStore::new(source);

		assert!(matches!(store.entry("ghost.js").await, MapEntry::Missing));
		assert!(matches!(store.entry("ghost.js").await, MapEntry::Missing));
		assert_eq!(loads.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn corrupt_map_is_negatively_cached() {
		let mut maps = HashMap::new();
		maps.insert("bad.js.map".to_string(), b"not a source map".to_vec());
		let (source, loads) = CountingSource::new(maps);
		let store = SourceMapStore::new(source);

		assert!(matches!(store.entry("bad.js").await, MapEntry::Missing));
		assert!(matches!(store.entry("bad.js").await, MapEntry::Missing));
		assert_eq!(loads.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn concurrent_first_requests_share_one_load() {
		let (source, loads) = single_map_source();
		let store = Arc::new(SourceMapStore::new(source));

		let tasks: Vec<_> = (0..8)
			.map(|_| {
				let store = Arc::clone(&store);
				tokio::spawn(async move { store.entry("bundle.js").await })
			})
			.collect();

		for task in tasks {
			assert!(matches!(task.await.unwrap(), MapEntry::Loaded(_)));
		}
		assert_eq!(loads.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn distinct_names_load_independently() {
		let mut maps = HashMap::new();
		maps.insert("a.js.map".to_string(), SAMPLE_MAP.as_bytes().to_vec());
		maps.insert("b.js.map".to_string(), SAMPLE_MAP.as_bytes().to_vec());
		let (source, loads) = CountingSource::new(maps);
		let store = SourceMapStore::new(source);

		assert!(matches!(store.entry("a.js").await, MapEntry::Loaded(_)));
		assert!(matches!(store.entry("b.js").await, MapEntry::Loaded(_)));
		assert_eq!(loads.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn directory_maps_reads_from_disk() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("bundle.js.map"), SAMPLE_MAP).unwrap();

		let source = DirectoryMaps::new(dir.path());
		assert!(source.load("bundle.js.map").await.unwrap().is_some());
		assert!(source.load("missing.js.map").await.unwrap().is_none());
	}
}
