//! The Local Cache Store: synchronous, always-available stats persistence.
//!
//! The cache is the immediate source of truth for the running session.
//! It persists the whole stats collection as one serialized record under a
//! well-known key, through the [`KeyValueStore`] seam (the embedding
//! application supplies whatever durable string store the platform has).

use crate::error::LocalStoreError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use treetype_engine::{SnippetStat, StatsCollection, UserConfig};

/// Key under which the stats collection is persisted.
pub const STATS_KEY: &str = "treetype_snippet_stats";

/// Key under which the user configuration is persisted.
pub const CONFIG_KEY: &str = "treetype_config";

/// A synchronous string key-value store, in the shape of web local
/// storage: `get_item`/`set_item` over strings.
pub trait KeyValueStore: Send {
    /// Read the value for a key, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Write the value for a key, overwriting any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

/// In-memory [`KeyValueStore`], for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed [`KeyValueStore`]: one file per key under a root directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LocalStoreError::Storage(e.to_string())),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| LocalStoreError::Storage(e.to_string()))?;
        std::fs::write(self.path_for(key), value)
            .map_err(|e| LocalStoreError::Storage(e.to_string()))
    }
}

/// The Local Cache Store for snippet stats.
///
/// Owns the [`STATS_KEY`] slot of the backing store. Reads and writes are
/// whole-collection and synchronous; the internal mutex makes the
/// read-modify-write in [`update`](LocalStatsStore::update) atomic against
/// concurrent callers.
#[derive(Debug)]
pub struct LocalStatsStore<S: KeyValueStore> {
    backend: Mutex<S>,
}

impl<S: KeyValueStore> LocalStatsStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    fn lock_backend(&self) -> MutexGuard<'_, S> {
        match self.backend.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read the full collection, applying the interactive-path policy:
    /// missing, unreadable, or corrupt content reads as an empty
    /// collection (logged, never failed).
    pub fn load(&self) -> StatsCollection {
        let backend = self.lock_backend();
        load_with_policy(&*backend)
    }

    /// Read the full collection, surfacing a corrupt or unreadable cache
    /// as an error. A missing cache is still an empty collection.
    pub fn try_load(&self) -> Result<StatsCollection, LocalStoreError> {
        let backend = self.lock_backend();
        try_load_stats(&*backend)
    }

    /// Overwrite the full persisted collection in one write.
    pub fn save(&self, stats: &StatsCollection) -> Result<(), LocalStoreError> {
        let mut backend = self.lock_backend();
        save_stats(&mut *backend, stats)
    }

    /// Read-modify-write a single record, seeding it on first occurrence.
    ///
    /// Returns the updated record. The whole operation runs under one
    /// lock, so two concurrent updates cannot lose each other's write.
    pub fn update(
        &self,
        snippet_id: &str,
        wpm: u32,
        accuracy: u32,
        now: DateTime<Utc>,
    ) -> Result<SnippetStat, LocalStoreError> {
        let mut backend = self.lock_backend();
        let mut stats = load_with_policy(&*backend);
        let updated = stats.record_practice(snippet_id, wpm, accuracy, now).clone();
        save_stats(&mut *backend, &stats)?;
        Ok(updated)
    }

    /// Load the user configuration, falling back to defaults when absent
    /// or unparseable.
    pub fn load_config(&self) -> UserConfig {
        let backend = self.lock_backend();
        match backend.get_item(CONFIG_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "persisted config unparseable, using defaults");
                UserConfig::default()
            }),
            Ok(None) => UserConfig::default(),
            Err(e) => {
                warn!(error = %e, "config read failed, using defaults");
                UserConfig::default()
            }
        }
    }

    /// Persist the user configuration.
    pub fn save_config(&self, config: &UserConfig) -> Result<(), LocalStoreError> {
        let raw = serde_json::to_string(config)
            .map_err(|e| LocalStoreError::Storage(format!("config serialization failed: {e}")))?;
        let mut backend = self.lock_backend();
        backend.set_item(CONFIG_KEY, &raw)
    }
}

fn try_load_stats<S: KeyValueStore + ?Sized>(
    backend: &S,
) -> Result<StatsCollection, LocalStoreError> {
    match backend.get_item(STATS_KEY)? {
        Some(raw) => Ok(StatsCollection::from_json(&raw)?),
        None => Ok(StatsCollection::new()),
    }
}

fn load_with_policy<S: KeyValueStore + ?Sized>(backend: &S) -> StatsCollection {
    match try_load_stats(backend) {
        Ok(stats) => stats,
        Err(e) => {
            warn!(error = %e, "local stats cache unreadable, starting empty");
            StatsCollection::new()
        }
    }
}

fn save_stats<S: KeyValueStore + ?Sized>(
    backend: &mut S,
    stats: &StatsCollection,
) -> Result<(), LocalStoreError> {
    let raw = stats.to_json()?;
    backend.set_item(STATS_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use treetype_engine::TypingMode;

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn load_missing_cache_is_empty() {
        let store = LocalStatsStore::new(MemoryStore::new());
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let store = LocalStatsStore::new(MemoryStore::new());

        let mut stats = StatsCollection::new();
        stats.record_practice("a", 70, 92, at(2024, 1, 1));
        store.save(&stats).unwrap();

        assert_eq!(store.load(), stats);
    }

    #[test]
    fn update_seeds_first_record() {
        let store = LocalStatsStore::new(MemoryStore::new());

        let stat = store.update("x", 70, 92, at(2024, 1, 1)).unwrap();

        assert_eq!(stat.best_wpm, 70);
        assert_eq!(stat.best_accuracy, 92);
        assert_eq!(stat.practice_count, 1);
        assert_eq!(stat.last_practiced, at(2024, 1, 1));
    }

    #[test]
    fn update_merges_best_fields() {
        let store = LocalStatsStore::new(MemoryStore::new());

        store.update("x", 70, 92, at(2024, 1, 1)).unwrap();
        let stat = store.update("x", 55, 96, at(2024, 1, 2)).unwrap();

        assert_eq!(stat.best_wpm, 70);
        assert_eq!(stat.best_accuracy, 96);
        assert_eq!(stat.practice_count, 2);
    }

    #[test]
    fn corrupt_cache_reads_empty_on_interactive_path() {
        let mut backend = MemoryStore::new();
        backend.set_item(STATS_KEY, "{definitely not json").unwrap();
        let store = LocalStatsStore::new(backend);

        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_cache_surfaces_via_try_load() {
        let mut backend = MemoryStore::new();
        backend.set_item(STATS_KEY, "[1, 2, 3]").unwrap();
        let store = LocalStatsStore::new(backend);

        assert!(matches!(
            store.try_load(),
            Err(LocalStoreError::Corrupt(_))
        ));
    }

    #[test]
    fn update_over_corrupt_cache_starts_fresh() {
        let mut backend = MemoryStore::new();
        backend.set_item(STATS_KEY, "oops").unwrap();
        let store = LocalStatsStore::new(backend);

        let stat = store.update("x", 40, 80, at(2024, 2, 2)).unwrap();
        assert_eq!(stat.practice_count, 1);

        let stats = store.try_load().unwrap();
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn config_defaults_when_missing() {
        let store = LocalStatsStore::new(MemoryStore::new());
        assert_eq!(store.load_config(), UserConfig::default());
    }

    #[test]
    fn config_roundtrip() {
        let store = LocalStatsStore::new(MemoryStore::new());
        let config = UserConfig {
            preset: TypingMode::Minimal,
            language: "rust".to_string(),
        };

        store.save_config(&config).unwrap();
        assert_eq!(store.load_config(), config);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("treetype-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut store = FileStore::new(&dir);
        assert!(store.get_item(STATS_KEY).unwrap().is_none());

        store.set_item(STATS_KEY, "{}").unwrap();
        assert_eq!(store.get_item(STATS_KEY).unwrap().as_deref(), Some("{}"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
