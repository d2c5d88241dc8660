use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use zainflix_models::{ListExport, Movie, WatchListEntry};

use crate::session::SessionStore;
use crate::storage::{keys, KeyValueStore};

/// Profile component of the scope key when no profile is selected.
const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Underlying persistence failure; membership is unchanged.
    Error,
}

/// Per-profile watch lists. The store exclusively owns the
/// `{scopeKey: [entries]}` document under `zainflix_mylist`; every read and
/// write is partitioned by the scope key derived from the active session
/// and profile.
#[derive(Clone)]
pub struct WatchListStore {
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
}

impl WatchListStore {
    pub fn new(store: Arc<dyn KeyValueStore>, session: SessionStore) -> Self {
        Self { store, session }
    }

    /// `email_profileName`, with the profile falling back to `default`.
    /// None when no session exists, since there is no user to scope to.
    pub fn scope_key(&self) -> Option<String> {
        let user = self.session.current_user()?;
        let profile = self
            .session
            .current_profile()
            .map(|p| p.name)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        Some(format!("{}_{}", user.email, profile))
    }

    fn load_all(&self) -> BTreeMap<String, Vec<WatchListEntry>> {
        let raw = match self.store.get(keys::MY_LIST) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read watch lists: {}", e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(lists) => lists,
            Err(e) => {
                warn!("Watch-list document is malformed, treating as empty: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, lists: &BTreeMap<String, Vec<WatchListEntry>>) -> bool {
        let raw = match serde_json::to_string(lists) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode watch lists: {}", e);
                return false;
            }
        };
        if let Err(e) = self.store.set(keys::MY_LIST, &raw) {
            warn!("Failed to persist watch lists: {}", e);
            return false;
        }
        true
    }

    /// The active scope's list in insertion order; empty when there is no
    /// scope or no entries.
    pub fn list(&self) -> Vec<WatchListEntry> {
        let Some(key) = self.scope_key() else {
            return Vec::new();
        };
        self.load_all().remove(&key).unwrap_or_default()
    }

    /// Appends the movie with `addedAt = now` and the given origin tag.
    /// Returns false without touching storage when the id is already
    /// present or no scope is active.
    pub fn add(&self, movie: Movie, origin: &str) -> bool {
        let Some(key) = self.scope_key() else {
            warn!("Cannot add to list: no user or profile selected");
            return false;
        };

        let mut lists = self.load_all();
        let entries = lists.entry(key).or_default();

        if entries.iter().any(|e| e.movie.id == movie.id) {
            debug!("Movie {} already in list", movie.id);
            return false;
        }

        let title = movie.display_title().to_string();
        entries.push(WatchListEntry {
            movie,
            added_at: Utc::now(),
            added_from: origin.to_string(),
        });

        if !self.persist(&lists) {
            return false;
        }
        debug!("Added to list: {}", title);
        true
    }

    /// Removes the entry with the given catalog id; false when not found.
    pub fn remove(&self, id: u64) -> bool {
        let Some(key) = self.scope_key() else {
            return false;
        };

        let mut lists = self.load_all();
        let Some(entries) = lists.get_mut(&key) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|e| e.movie.id != id);
        if entries.len() == before {
            debug!("Movie {} not found in list", id);
            return false;
        }

        if !self.persist(&lists) {
            return false;
        }
        debug!("Removed from list: {}", id);
        true
    }

    pub fn is_present(&self, id: u64) -> bool {
        self.list().iter().any(|e| e.movie.id == id)
    }

    pub fn toggle(&self, movie: Movie, origin: &str) -> ToggleOutcome {
        if self.is_present(movie.id) {
            if self.remove(movie.id) {
                ToggleOutcome::Removed
            } else {
                ToggleOutcome::Error
            }
        } else if self.add(movie, origin) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Error
        }
    }

    /// Deletes the active scope's entire list; other scopes are untouched.
    pub fn clear(&self) -> bool {
        let Some(key) = self.scope_key() else {
            return false;
        };
        let mut lists = self.load_all();
        lists.remove(&key);
        if !self.persist(&lists) {
            return false;
        }
        debug!("List cleared for scope {}", key);
        true
    }

    /// Read-only snapshot of the active list; no side effects.
    pub fn export(&self) -> Option<ListExport> {
        let user = self.session.current_user()?;
        let profile = self
            .session
            .current_profile()
            .map(|p| p.name)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        Some(ListExport {
            user: user.email,
            profile,
            movies: self.list(),
            exported_at: Utc::now(),
        })
    }

    /// Every scope's list; used for diagnostics only.
    pub fn all_lists(&self) -> BTreeMap<String, Vec<WatchListEntry>> {
        self.load_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use zainflix_models::Session;

    fn movie(id: u64, title: &str) -> Movie {
        let mut m = Movie::new(id);
        m.title = Some(title.to_string());
        m
    }

    fn stores() -> (SessionStore, WatchListStore) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        let list = WatchListStore::new(kv, session.clone());
        (session, list)
    }

    fn signed_in(email: &str, profile: &str) -> (SessionStore, WatchListStore) {
        let (session, list) = stores();
        session.login(&Session::new(email), false);
        session.select_profile(profile, "#f000ff");
        (session, list)
    }

    #[test]
    fn test_scope_key_requires_session() {
        let (session, list) = stores();
        assert_eq!(list.scope_key(), None);
        assert!(!list.add(movie(1, "A"), "test"));

        session.login(&Session::new("a@x.com"), false);
        // No profile selected yet: falls back to default
        assert_eq!(list.scope_key().as_deref(), Some("a@x.com_default"));

        session.select_profile("Katana", "#f000ff");
        assert_eq!(list.scope_key().as_deref(), Some("a@x.com_Katana"));
    }

    #[test]
    fn test_add_then_present_remove_then_absent() {
        let (_, list) = signed_in("a@x.com", "Katana");

        assert!(list.add(movie(603, "The Matrix"), "browse"));
        assert!(list.is_present(603));

        assert!(list.remove(603));
        assert!(!list.is_present(603));
        assert!(!list.remove(603));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let (_, list) = signed_in("a@x.com", "Katana");

        assert!(list.add(movie(603, "The Matrix"), "browse"));
        assert!(!list.add(movie(603, "The Matrix"), "browse"));
        assert_eq!(list.list().len(), 1);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let (_, list) = signed_in("a@x.com", "Katana");

        assert_eq!(list.toggle(movie(603, "The Matrix"), "browse"), ToggleOutcome::Added);
        assert_eq!(list.toggle(movie(603, "The Matrix"), "browse"), ToggleOutcome::Removed);
        assert!(!list.is_present(603));
    }

    #[test]
    fn test_scope_isolation_between_profiles() {
        let (session, list) = signed_in("a@x.com", "Katana");
        assert!(list.add(movie(603, "The Matrix"), "browse"));

        session.select_profile("Robot", "#00f0ff");
        assert!(list.list().is_empty());
        assert!(!list.is_present(603));

        session.select_profile("Katana", "#f000ff");
        assert!(list.is_present(603));
    }

    #[test]
    fn test_clear_leaves_other_scopes_untouched() {
        let (session, list) = signed_in("a@x.com", "Katana");
        assert!(list.add(movie(1, "A"), "browse"));

        session.select_profile("Robot", "#00f0ff");
        assert!(list.add(movie(2, "B"), "browse"));
        assert!(list.clear());
        assert!(list.list().is_empty());

        session.select_profile("Katana", "#f000ff");
        assert_eq!(list.list().len(), 1);
    }

    #[test]
    fn test_list_survives_logout_login_cycle() {
        let (session, list) = signed_in("a@x.com", "Katana");
        assert!(list.add(movie(603, "The Matrix"), "browse"));

        assert!(session.logout());
        assert!(list.list().is_empty()); // no scope while logged out

        session.login(&Session::new("a@x.com"), false);
        session.select_profile("Katana", "#f000ff");
        assert!(list.is_present(603));
    }

    #[test]
    fn test_export_snapshot() {
        let (_, list) = signed_in("a@x.com", "Katana");
        list.add(movie(603, "The Matrix"), "browse");

        let export = list.export().unwrap();
        assert_eq!(export.user, "a@x.com");
        assert_eq!(export.profile, "Katana");
        assert_eq!(export.movies.len(), 1);
        // Snapshot, no side effect
        assert_eq!(list.list().len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_, list) = signed_in("a@x.com", "Katana");
        list.add(movie(3, "C"), "browse");
        list.add(movie(1, "A"), "browse");
        list.add(movie(2, "B"), "browse");

        let ids: Vec<u64> = list.list().iter().map(|e| e.movie.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
