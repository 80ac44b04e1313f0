//! The sync engine: dual-write on every practice result, plus the guarded
//! merge pass that reconciles local and remote snapshots.
//!
//! Local-first throughout: the local cache write always happens, always
//! synchronously, and never waits on the network. Remote operations are
//! best-effort; their failures are logged here and never surfaced.
//!
//! # Merge pass
//!
//! 1. Read the local collection.
//! 2. Read the remote collection for the bound identity (a failed read
//!    merges as an empty remote).
//! 3. Adopt records only the remote has; combine shared records
//!    field-wise. Records only the local side has are untouched.
//! 4. Persist the merged collection locally, in one write, only if
//!    something changed.
//! 5. Republish every record to the remote store, changed or not, so
//!    locally-known records become durable remotely even on a no-op merge.
//!
//! The session's in-progress flag allows at most one pass at a time;
//! overlapping requests are dropped, not queued.

use crate::local::{KeyValueStore, LocalStatsStore};
use crate::remote::RemoteStatsStore;
use crate::session::SyncSession;
use crate::LocalStoreError;
use chrono::Utc;
use tracing::{debug, error, info, warn};
use treetype_engine::{StatsCollection, UserId};

/// Orchestrates the local cache, the remote adapter, and the session.
#[derive(Debug)]
pub struct SyncEngine<S: KeyValueStore, R: RemoteStatsStore> {
    local: LocalStatsStore<S>,
    remote: R,
    session: SyncSession,
}

impl<S: KeyValueStore, R: RemoteStatsStore> SyncEngine<S, R> {
    /// Create an engine over a local backend and a remote adapter. No
    /// identity is bound; the engine starts local-only.
    pub fn new(local_backend: S, remote: R) -> Self {
        Self {
            local: LocalStatsStore::new(local_backend),
            remote,
            session: SyncSession::new(),
        }
    }

    /// The local cache store, for direct stat reads by the UI.
    pub fn local(&self) -> &LocalStatsStore<S> {
        &self.local
    }

    /// The identity sync is currently bound to, if any.
    pub fn current_user(&self) -> Option<UserId> {
        self.session.current_user()
    }

    /// Whether a merge pass is running right now.
    pub fn is_syncing(&self) -> bool {
        self.session.is_syncing()
    }

    /// Record one practice completion.
    ///
    /// The local cache is updated synchronously and is authoritative the
    /// moment this returns. If an identity is bound, the updated record is
    /// also pushed to the remote store; that push is best-effort and its
    /// failure neither rolls back nor retries the local write.
    pub async fn record_practice(&self, snippet_id: &str, wpm: u32, accuracy: u32) {
        let now = Utc::now();
        let stat = match self.local.update(snippet_id, wpm, accuracy, now) {
            Ok(stat) => stat,
            Err(e) => {
                error!(snippet = snippet_id, error = %e, "local stats write failed, update lost");
                return;
            }
        };
        debug!(snippet = snippet_id, wpm, accuracy, "practice recorded");

        if let Some(user_id) = self.session.current_user() {
            if let Err(e) = self.remote.put(&user_id, snippet_id, &stat).await {
                warn!(
                    user = %user_id,
                    snippet = snippet_id,
                    error = %e,
                    "remote stat write failed, keeping local only"
                );
            }
        }
    }

    /// Bind a remote identity and immediately run one merge pass.
    pub async fn enable_sync(&self, user_id: impl Into<UserId>) {
        let user_id = user_id.into();
        info!(user = %user_id, "sync enabled");
        self.session.bind(user_id);
        self.perform_sync().await;
    }

    /// Clear the bound identity.
    ///
    /// A merge pass already in flight is not cancelled; it completes and
    /// writes under the identity it captured at its start. Only future
    /// passes are prevented.
    pub fn disable_sync(&self) {
        info!("sync disabled");
        self.session.clear();
    }

    /// Run one merge pass, if an identity is bound and none is running.
    ///
    /// A no-op when no identity is bound or a pass is in flight —
    /// overlapping requests return immediately without queuing. Errors
    /// inside the pass are logged and swallowed; this never fails the
    /// caller.
    pub async fn perform_sync(&self) {
        let Some(user_id) = self.session.current_user() else {
            debug!("sync requested with no identity bound, skipping");
            return;
        };
        let Some(_guard) = self.session.try_begin_sync() else {
            debug!(user = %user_id, "sync already in progress, dropping request");
            return;
        };

        if let Err(e) = self.sync_pass(&user_id).await {
            error!(user = %user_id, error = %e, "sync pass failed");
        }
        // _guard drops here, clearing the in-progress flag on every path
    }

    async fn sync_pass(&self, user_id: &str) -> Result<(), LocalStoreError> {
        let mut merged = self.local.load();

        let remote = match self.remote.get_all(user_id).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(user = %user_id, error = %e, "remote read failed, merging empty remote");
                StatsCollection::new()
            }
        };

        let report = merged.merge_remote(&remote);
        if report.local_changed() {
            // Local write happens-before the remote republish below.
            self.local.save(&merged)?;
            info!(
                user = %user_id,
                changed = report.changed.len(),
                "merged remote stats into local cache"
            );
        }

        for (snippet_id, stat) in merged.iter() {
            if let Err(e) = self.remote.put(user_id, snippet_id, stat).await {
                warn!(
                    user = %user_id,
                    snippet = %snippet_id,
                    error = %e,
                    "remote republish failed"
                );
            }
        }

        debug!(user = %user_id, records = merged.len(), "sync pass complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryStore;
    use crate::remote::MemoryRemoteStore;

    fn engine_with_remote() -> (SyncEngine<MemoryStore, MemoryRemoteStore>, MemoryRemoteStore) {
        let remote = MemoryRemoteStore::new();
        (SyncEngine::new(MemoryStore::new(), remote.clone()), remote)
    }

    #[tokio::test]
    async fn record_practice_without_identity_stays_local() {
        let (engine, remote) = engine_with_remote();

        engine.record_practice("x", 70, 92).await;

        let stats = engine.local().load();
        let stat = stats.get("x").unwrap();
        assert_eq!(stat.best_wpm, 70);
        assert_eq!(stat.practice_count, 1);

        assert_eq!(remote.record_count("alice"), 0);
    }

    #[tokio::test]
    async fn record_practice_with_identity_dual_writes() {
        let (engine, remote) = engine_with_remote();
        engine.enable_sync("alice").await;

        engine.record_practice("x", 70, 92).await;

        assert_eq!(engine.local().load().get("x").unwrap().best_wpm, 70);
        assert_eq!(remote.stat_for("alice", "x").unwrap().best_wpm, 70);
    }

    #[tokio::test]
    async fn enable_sync_pulls_remote_records() {
        let (engine, remote) = engine_with_remote();
        remote
            .put(
                "alice",
                "cloud-only",
                &treetype_engine::SnippetStat::first_attempt(44, 88, Utc::now()),
            )
            .await
            .unwrap();

        engine.enable_sync("alice").await;

        assert_eq!(engine.local().load().get("cloud-only").unwrap().best_wpm, 44);
    }

    #[tokio::test]
    async fn disable_sync_stops_remote_writes() {
        let (engine, remote) = engine_with_remote();
        engine.enable_sync("alice").await;
        engine.disable_sync();

        engine.record_practice("x", 70, 92).await;

        assert_eq!(engine.current_user(), None);
        assert!(remote.stat_for("alice", "x").is_none());
        assert_eq!(engine.local().load().len(), 1);
    }

    #[tokio::test]
    async fn perform_sync_without_identity_is_noop() {
        let (engine, remote) = engine_with_remote();
        engine.perform_sync().await;
        assert_eq!(remote.record_count("alice"), 0);
        assert!(!engine.is_syncing());
    }
}
