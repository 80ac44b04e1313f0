//! Error types for the sync layer.

use thiserror::Error;

/// Errors from the local key-value cache.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// The backing store could not be read or written.
    #[error("local storage unavailable: {0}")]
    Storage(String),

    /// The persisted payload exists but could not be parsed. Callers on
    /// the interactive path treat this as "no data yet"; `try_load`
    /// surfaces it so embedders can detect silent-data-loss situations.
    #[error(transparent)]
    Corrupt(#[from] treetype_engine::Error),
}

/// Errors from the remote document store.
///
/// The sync engine never propagates these to its callers; they exist so
/// the log-and-discard contract is explicit and testable.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("remote transport error: {0}")]
    Transport(String),

    #[error("remote backend rejected request: {0}")]
    Backend(String),
}
