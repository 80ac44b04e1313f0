//! Session binding: the active remote identity and the sync guard.
//!
//! One `SyncSession` is owned by one [`SyncEngine`](crate::SyncEngine), so
//! independent engines (tests, multiple accounts) never share mutable
//! state. The sync-in-progress flag is the only mutual-exclusion primitive
//! in the system; it guards the merge pass alone, never the local cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use treetype_engine::UserId;

/// Holds at most one bound remote identity and the sync-in-progress flag.
#[derive(Debug, Default)]
pub struct SyncSession {
    user: Mutex<Option<UserId>>,
    syncing: AtomicBool,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a remote identity, replacing any previous one.
    pub fn bind(&self, user_id: impl Into<UserId>) {
        *self.lock_user() = Some(user_id.into());
    }

    /// Clear the bound identity. A merge pass already in flight keeps the
    /// identity it captured at its start.
    pub fn clear(&self) {
        *self.lock_user() = None;
    }

    /// The currently bound identity, if any.
    pub fn current_user(&self) -> Option<UserId> {
        self.lock_user().clone()
    }

    /// Whether a merge pass is currently running.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Claim the sync-in-progress flag.
    ///
    /// Returns `None` when a pass is already running; callers must treat
    /// that as "drop the request", not "wait". The returned guard clears
    /// the flag on drop, so the flag is released on success and on early
    /// exit alike.
    pub fn try_begin_sync(&self) -> Option<SyncGuard<'_>> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SyncGuard { session: self })
    }

    fn lock_user(&self) -> std::sync::MutexGuard<'_, Option<UserId>> {
        match self.user.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// RAII claim on the sync-in-progress flag.
#[derive(Debug)]
pub struct SyncGuard<'a> {
    session: &'a SyncSession,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.session.syncing.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_clear_identity() {
        let session = SyncSession::new();
        assert_eq!(session.current_user(), None);

        session.bind("alice");
        assert_eq!(session.current_user().as_deref(), Some("alice"));

        session.bind("bob"); // rebinding replaces
        assert_eq!(session.current_user().as_deref(), Some("bob"));

        session.clear();
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn guard_is_exclusive_and_non_queuing() {
        let session = SyncSession::new();

        let guard = session.try_begin_sync().expect("flag was free");
        assert!(session.is_syncing());

        // second claim is dropped, not queued
        assert!(session.try_begin_sync().is_none());

        drop(guard);
        assert!(!session.is_syncing());
        assert!(session.try_begin_sync().is_some());
    }

    #[test]
    fn guard_releases_on_early_exit() {
        let session = SyncSession::new();

        fn pass_that_bails(session: &SyncSession) -> Result<(), ()> {
            let _guard = session.try_begin_sync().ok_or(())?;
            Err(()) // simulated failure mid-pass
        }

        assert!(pass_that_bails(&session).is_err());
        assert!(!session.is_syncing());
    }
}
