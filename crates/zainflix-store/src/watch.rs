use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};
use zainflix_models::Session;

use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Changed,
    Unchanged,
}

/// Detects session, profile, and watch-list state mutated by another process
/// sharing the storage directory. There is no push channel on the substrate,
/// so callers poll this on a fixed interval; the watcher only fingerprints
/// raw stored strings and never parses them beyond extracting the email.
/// Swapping in a push-capable backend means replacing this type, not its
/// callers.
pub struct StoreWatcher {
    store: Arc<dyn KeyValueStore>,
    last_fingerprint: Option<u64>,
}

impl StoreWatcher {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            last_fingerprint: None,
        }
    }

    fn raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {} while fingerprinting: {}", key, e);
                None
            }
        }
    }

    fn fingerprint(&self) -> u64 {
        let session_raw = self.raw(keys::USER_SESSION);
        let mut hasher = DefaultHasher::new();
        session_raw.hash(&mut hasher);
        self.raw(keys::SELECTED_PROFILE).hash(&mut hasher);
        self.raw(keys::MY_LIST).hash(&mut hasher);

        // Per-user profile documents are keyed by email, so they only count
        // once we know whose they are
        if let Some(email) = session_raw
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Session>(raw).ok())
            .map(|s| s.email)
        {
            self.raw(&keys::custom_profiles(&email)).hash(&mut hasher);
            self.raw(&keys::deleted_profiles(&email)).hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Compares the current fingerprint against the last observed one. The
    /// first poll establishes the baseline and reports Unchanged.
    pub fn poll(&mut self) -> StoreChange {
        let current = self.fingerprint();
        match self.last_fingerprint.replace(current) {
            None => StoreChange::Unchanged,
            Some(previous) if previous == current => StoreChange::Unchanged,
            Some(_) => {
                debug!("Stored state changed outside this process");
                StoreChange::Changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::storage::MemoryStore;
    use crate::watchlist::WatchListStore;
    use zainflix_models::Movie;

    #[test]
    fn test_first_poll_establishes_baseline() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut watcher = StoreWatcher::new(kv);
        assert_eq!(watcher.poll(), StoreChange::Unchanged);
        assert_eq!(watcher.poll(), StoreChange::Unchanged);
    }

    #[test]
    fn test_session_change_is_detected() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        let mut watcher = StoreWatcher::new(Arc::clone(&kv));
        watcher.poll();

        session.login(&Session::new("a@x.com"), false);
        assert_eq!(watcher.poll(), StoreChange::Changed);
        assert_eq!(watcher.poll(), StoreChange::Unchanged);
    }

    #[test]
    fn test_profile_switch_is_detected() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        session.login(&Session::new("a@x.com"), false);

        let mut watcher = StoreWatcher::new(Arc::clone(&kv));
        watcher.poll();

        session.select_profile("Robot", "#00f0ff");
        assert_eq!(watcher.poll(), StoreChange::Changed);
    }

    #[test]
    fn test_watch_list_change_is_detected() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        session.login(&Session::new("a@x.com"), false);
        session.select_profile("Katana", "#f000ff");
        let lists = WatchListStore::new(Arc::clone(&kv), session);

        let mut watcher = StoreWatcher::new(Arc::clone(&kv));
        watcher.poll();

        assert!(lists.add(Movie::new(603), "test"));
        assert_eq!(watcher.poll(), StoreChange::Changed);
        assert_eq!(watcher.poll(), StoreChange::Unchanged);
    }

    #[test]
    fn test_custom_profile_edit_for_current_user_is_detected() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        session.login(&Session::new("a@x.com"), false);

        let mut watcher = StoreWatcher::new(Arc::clone(&kv));
        watcher.poll();

        kv.set(&keys::custom_profiles("a@x.com"), r##"{"X":{"icon":"i","color":"#fff","avatar":"u"}}"##)
            .unwrap();
        assert_eq!(watcher.poll(), StoreChange::Changed);
    }
}
