use spawnwatch_common::{recompute_time_left, visible_entries, Denylist, Entry, Status};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Everything the three tracker routines share. One per process.
pub struct SessionState {
    address: RwLock<Option<String>>,
    entries: RwLock<Vec<Entry>>,
    status: RwLock<Status>,
    denylist: Denylist,
}

impl SessionState {
    pub fn new(denylist: Denylist) -> Self {
        Self {
            address: RwLock::new(None),
            entries: RwLock::new(Vec::new()),
            status: RwLock::new(Status::Unknown),
            denylist,
        }
    }

    pub async fn address(&self) -> Option<String> {
        self.address.read().await.clone()
    }

    /// First write wins; the address is never replaced or cleared.
    /// Returns whether this call stored it.
    pub(crate) async fn set_address(&self, address: String) -> bool {
        let mut guard = self.address.write().await;
        if guard.is_some() {
            return false;
        }
        *guard = Some(address);
        true
    }

    pub async fn status(&self) -> Status {
        *self.status.read().await
    }

    pub(crate) async fn set_status(&self, status: Status) {
        *self.status.write().await = status;
    }

    /// All held entries, denylisted ones included
    pub async fn entries(&self) -> Vec<Entry> {
        self.entries.read().await.clone()
    }

    /// Held entries minus the denylisted categories, evaluated on every call
    pub async fn visible_entries(&self) -> Vec<Entry> {
        visible_entries(&self.entries.read().await, &self.denylist)
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Replace the held entries with the survivors of `fresh` at `now`.
    /// Returns how many were kept.
    pub(crate) async fn replace_entries(&self, fresh: Vec<Entry>, now: DateTime<Utc>) -> usize {
        let kept = recompute_time_left(fresh, now);
        let count = kept.len();
        *self.entries.write().await = kept;
        count
    }

    /// Recompute the held entries in place; returns (kept, dropped).
    pub(crate) async fn recompute_entries(&self, now: DateTime<Utc>) -> (usize, usize) {
        let mut guard = self.entries.write().await;
        let held = std::mem::take(&mut *guard);
        let before = held.len();
        *guard = recompute_time_left(held, now);
        (guard.len(), before - guard.len())
    }
}
