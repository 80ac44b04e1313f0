//! # TreeType Sync
//!
//! Local-first persistence and best-effort cloud sync for TreeType stats.
//!
//! The local cache is authoritative for the running session: every practice
//! result is written to it synchronously, so stats are available instantly
//! and offline. When a remote identity is bound, the same update is also
//! pushed to the account-scoped remote store, and enabling sync runs one
//! merge pass that reconciles the two snapshots without ever losing
//! progress (all stat fields are monotonic-merge-safe, see
//! `treetype-engine`).
//!
//! ## Components
//!
//! - [`KeyValueStore`] — the synchronous string key-value seam the local
//!   cache persists through ([`MemoryStore`] and [`FileStore`] ship here)
//! - [`LocalStatsStore`] — the Local Cache Store: whole-collection load,
//!   save, and read-modify-write update under a well-known key
//! - [`RemoteStatsStore`] — the Remote Store Adapter contract: async
//!   per-record upsert and collection-scoped read-all, keyed by user id
//! - [`SyncSession`] — the bound remote identity plus the non-queuing
//!   sync-in-progress guard
//! - [`SyncEngine`] — dual-write on every practice result and the guarded
//!   merge pass
//!
//! ## Failure policy
//!
//! Remote failures never reach the interactive path. The adapter returns
//! honest `Result`s; the engine logs and discards `put` errors and treats a
//! failed `get_all` as "nothing new from remote". The only observable
//! effect of an outage is that cross-device convergence waits for a later
//! successful sync.

pub mod engine;
pub mod error;
pub mod local;
pub mod remote;
pub mod session;

pub use engine::SyncEngine;
pub use error::{LocalStoreError, RemoteStoreError};
pub use local::{FileStore, KeyValueStore, LocalStatsStore, MemoryStore};
pub use remote::{MemoryRemoteStore, RemoteStatsStore};
pub use session::SyncSession;
