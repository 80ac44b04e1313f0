//! The Remote Store Adapter contract.
//!
//! Wraps a keyed document store scoped by an opaque user id supplied by
//! the embedding application's identity layer. Implementations hold no
//! cached state; every call round-trips to the backing store.
//!
//! Both operations return honest `Result`s. The failure *policy* (log and
//! discard writes, treat a failed read as an empty remote) belongs to the
//! [`SyncEngine`](crate::SyncEngine), not the adapter, so the "never
//! surfaced" contract stays auditable.

use crate::error::RemoteStoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use treetype_engine::{SnippetStat, StatsCollection};

/// Asynchronous per-user document store for snippet stats.
#[async_trait]
pub trait RemoteStatsStore: Send + Sync {
    /// Upsert one record keyed by `(user_id, snippet_id)`.
    async fn put(
        &self,
        user_id: &str,
        snippet_id: &str,
        stat: &SnippetStat,
    ) -> Result<(), RemoteStoreError>;

    /// Read every record owned by `user_id`.
    async fn get_all(&self, user_id: &str) -> Result<StatsCollection, RemoteStoreError>;
}

/// In-memory [`RemoteStatsStore`], for tests and single-process setups.
///
/// Cloning yields another handle to the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    users: Arc<DashMap<String, BTreeMap<String, SnippetStat>>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one stored record, bypassing the adapter contract.
    pub fn stat_for(&self, user_id: &str, snippet_id: &str) -> Option<SnippetStat> {
        self.users
            .get(user_id)
            .and_then(|stats| stats.get(snippet_id).cloned())
    }

    /// Number of records stored for a user.
    pub fn record_count(&self, user_id: &str) -> usize {
        self.users.get(user_id).map_or(0, |stats| stats.len())
    }
}

#[async_trait]
impl RemoteStatsStore for MemoryRemoteStore {
    async fn put(
        &self,
        user_id: &str,
        snippet_id: &str,
        stat: &SnippetStat,
    ) -> Result<(), RemoteStoreError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .insert(snippet_id.to_string(), stat.clone());
        Ok(())
    }

    async fn get_all(&self, user_id: &str) -> Result<StatsCollection, RemoteStoreError> {
        let stats = self
            .users
            .get(user_id)
            .map(|stats| stats.clone().into_iter().collect())
            .unwrap_or_default();
        Ok(stats)
    }
}
