//! Shared status registry.
//!
//! Maps a session id to the status entry the reporter polls. Every
//! operation takes the registry's own lock; callers never lock around it.
//! Insertion order is kept so the status message lists transfers in the
//! order they started.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use mirror_core::{SessionId, StatusSnapshot, TransferStatus};

type Entries = IndexMap<SessionId, Arc<dyn TransferStatus>>;

/// Concurrent mapping from session id to status entry.
#[derive(Default)]
pub struct StatusRegistry {
    entries: Mutex<Entries>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the entry for `id`, returning the previous one.
    pub fn insert(
        &self,
        id: SessionId,
        entry: Arc<dyn TransferStatus>,
    ) -> Option<Arc<dyn TransferStatus>> {
        self.lock().insert(id, entry)
    }

    pub fn remove(&self, id: SessionId) -> Option<Arc<dyn TransferStatus>> {
        self.lock().shift_remove(&id)
    }

    /// Remove the entry for `id` only if it is still `expected`.
    ///
    /// A later stage (e.g. upload) may have replaced the entry; that
    /// replacement is left alone.
    pub fn remove_if_same(&self, id: SessionId, expected: &Arc<dyn TransferStatus>) -> bool {
        let mut entries = self.lock();
        let same = entries
            .get(&id)
            .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(expected)));
        if same {
            entries.shift_remove(&id);
        }
        same
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<dyn TransferStatus>> {
        self.lock().get(&id).cloned()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clone out all entries, in insertion order.
    ///
    /// The lock is released before the caller reads any entry.
    pub fn entries(&self) -> Vec<(SessionId, Arc<dyn TransferStatus>)> {
        self.lock()
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(entry)))
            .collect()
    }

    /// Point-in-time snapshots of every entry.
    pub fn snapshots(&self) -> Vec<(SessionId, StatusSnapshot)> {
        self.entries()
            .into_iter()
            .map(|(id, entry)| (id, entry.snapshot()))
            .collect()
    }
}
