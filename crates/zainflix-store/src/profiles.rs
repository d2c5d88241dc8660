use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use zainflix_models::{ProfileAttrs, ProfileSource, ResolvedProfile, SelectedProfile};

use crate::session::SessionStore;
use crate::storage::{keys, KeyValueStore};

/// User-key component when no session exists.
const DEFAULT_USER: &str = "default";

/// Profile identities: a fixed built-in set merged with the current user's
/// custom profiles, minus the user's soft-deleted names. The registry
/// exclusively owns the per-user custom and deleted-profile documents.
#[derive(Clone)]
pub struct ProfileRegistry {
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
}

/// The code-defined profiles every user starts with. Immutable; a user hides
/// one through the deny-list rather than mutating it.
pub fn builtin_profiles() -> BTreeMap<String, ProfileAttrs> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "Katana".to_string(),
        ProfileAttrs {
            icon: "swords".to_string(),
            color: "#f000ff".to_string(),
            avatar: "https://ui-avatars.com/api/?name=Katana&background=f000ff&color=fff&size=128"
                .to_string(),
        },
    );
    profiles.insert(
        "VR User".to_string(),
        ProfileAttrs {
            icon: "head_mounted_device".to_string(),
            color: "#8b5cf6".to_string(),
            avatar: "https://ui-avatars.com/api/?name=VR+User&background=8b5cf6&color=fff&size=128"
                .to_string(),
        },
    );
    profiles.insert(
        "Robot".to_string(),
        ProfileAttrs {
            icon: "smart_toy".to_string(),
            color: "#00f0ff".to_string(),
            avatar: "https://ui-avatars.com/api/?name=Robot&background=00f0ff&color=000&size=128"
                .to_string(),
        },
    );
    profiles
}

/// Deterministic avatar for a custom profile, derived from name and color.
pub fn avatar_url(name: &str, color: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff&size=128",
        urlencoding::encode(name),
        color.trim_start_matches('#')
    )
}

impl ProfileRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, session: SessionStore) -> Self {
        Self { store, session }
    }

    fn user_key(&self) -> String {
        self.session
            .current_user()
            .map(|s| s.email)
            .unwrap_or_else(|| DEFAULT_USER.to_string())
    }

    fn custom_profiles(&self) -> BTreeMap<String, ProfileAttrs> {
        let key = keys::custom_profiles(&self.user_key());
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read custom profiles: {}", e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Custom-profile document is malformed, treating as empty: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn deleted_names(&self) -> Vec<String> {
        let key = keys::deleted_profiles(&self.user_key());
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read deleted profiles: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(e) => {
                warn!("Deleted-profile document is malformed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Single resolution point for the two provenances: custom overrides
    /// builtin by name, soft-deleted names are excluded.
    pub fn profiles(&self) -> BTreeMap<String, ResolvedProfile> {
        let deleted = self.deleted_names();
        let mut merged: BTreeMap<String, ResolvedProfile> = builtin_profiles()
            .into_iter()
            .map(|(name, attrs)| {
                (
                    name,
                    ResolvedProfile {
                        attrs,
                        source: ProfileSource::Builtin,
                    },
                )
            })
            .collect();
        for (name, attrs) in self.custom_profiles() {
            merged.insert(
                name,
                ResolvedProfile {
                    attrs,
                    source: ProfileSource::Custom,
                },
            );
        }
        merged.retain(|name, _| !deleted.contains(name));
        merged
    }

    /// None when the name is unknown or soft-deleted for this user.
    pub fn profile(&self, name: &str) -> Option<ResolvedProfile> {
        self.profiles().remove(name)
    }

    pub fn is_deleted(&self, name: &str) -> bool {
        self.deleted_names().iter().any(|n| n == name)
    }

    /// Upserts into the current user's custom set. The avatar is derived
    /// from name and color when not supplied.
    pub fn save_profile(&self, name: &str, color: &str, icon: &str, avatar: Option<String>) -> bool {
        let mut profiles = self.custom_profiles();
        profiles.insert(
            name.to_string(),
            ProfileAttrs {
                icon: icon.to_string(),
                color: color.to_string(),
                avatar: avatar.unwrap_or_else(|| avatar_url(name, color)),
            },
        );

        let key = keys::custom_profiles(&self.user_key());
        let raw = match serde_json::to_string(&profiles) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode custom profiles: {}", e);
                return false;
            }
        };
        if let Err(e) = self.store.set(&key, &raw) {
            warn!("Failed to persist custom profiles: {}", e);
            return false;
        }
        debug!("Profile saved for {}: {}", self.user_key(), name);
        true
    }

    /// Soft delete: the name goes on the per-user deny-list and the
    /// underlying record is kept, so a built-in profile can be suppressed
    /// without being mutated.
    pub fn delete_profile(&self, name: &str) -> bool {
        let mut deleted = self.deleted_names();
        if deleted.iter().any(|n| n == name) {
            return false;
        }
        deleted.push(name.to_string());

        let key = keys::deleted_profiles(&self.user_key());
        let raw = match serde_json::to_string(&deleted) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode deleted profiles: {}", e);
                return false;
            }
        };
        if let Err(e) = self.store.set(&key, &raw) {
            warn!("Failed to persist deleted profiles: {}", e);
            return false;
        }
        debug!("Profile soft-deleted for {}: {}", self.user_key(), name);
        true
    }

    /// Writes the selection when the name resolves; warns and returns None
    /// otherwise. The caller is responsible for the user-facing notice.
    pub fn switch_profile(&self, name: &str) -> Option<SelectedProfile> {
        let Some(profile) = self.profile(name) else {
            warn!("Profile not found: {}", name);
            return None;
        };
        if !self.session.select_profile(name, &profile.attrs.color) {
            return None;
        }
        self.session.current_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use zainflix_models::Session;

    fn registry_for(email: &str) -> (SessionStore, ProfileRegistry) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        session.login(&Session::new(email), false);
        let registry = ProfileRegistry::new(kv, session.clone());
        (session, registry)
    }

    #[test]
    fn test_builtins_present_by_default() {
        let (_, registry) = registry_for("a@x.com");
        let profiles = registry.profiles();
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles["Katana"].source, ProfileSource::Builtin);
        assert_eq!(profiles["Robot"].attrs.color, "#00f0ff");
    }

    #[test]
    fn test_custom_overrides_builtin_by_name() {
        let (_, registry) = registry_for("a@x.com");
        assert!(registry.save_profile("Katana", "#123456", "swords", None));

        let resolved = registry.profile("Katana").unwrap();
        assert_eq!(resolved.source, ProfileSource::Custom);
        assert_eq!(resolved.attrs.color, "#123456");
    }

    #[test]
    fn test_avatar_derived_from_name_and_color() {
        let (_, registry) = registry_for("a@x.com");
        registry.save_profile("Night Owl", "#8b5cf6", "owl", None);

        let resolved = registry.profile("Night Owl").unwrap();
        assert_eq!(
            resolved.attrs.avatar,
            "https://ui-avatars.com/api/?name=Night%20Owl&background=8b5cf6&color=fff&size=128"
        );
    }

    #[test]
    fn test_soft_delete_hides_but_keeps_record() {
        let (_, registry) = registry_for("a@x.com");
        assert!(registry.delete_profile("Robot"));
        assert!(registry.is_deleted("Robot"));
        assert!(registry.profile("Robot").is_none());
        assert!(!registry.profiles().contains_key("Robot"));
        // Re-deleting is a no-op
        assert!(!registry.delete_profile("Robot"));
    }

    #[test]
    fn test_deletion_is_scoped_per_user() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&kv));
        let registry = ProfileRegistry::new(Arc::clone(&kv), session.clone());

        session.login(&Session::new("a@x.com"), false);
        registry.delete_profile("Robot");
        assert!(registry.is_deleted("Robot"));

        session.logout();
        session.login(&Session::new("b@x.com"), false);
        assert!(!registry.is_deleted("Robot"));
        assert!(registry.profile("Robot").is_some());
    }

    #[test]
    fn test_switch_profile_writes_selection() {
        let (session, registry) = registry_for("a@x.com");
        let selected = registry.switch_profile("Katana").unwrap();
        assert_eq!(selected.name, "Katana");
        assert_eq!(selected.theme, "#f000ff");
        assert_eq!(session.current_profile().unwrap().name, "Katana");
    }

    #[test]
    fn test_switch_unknown_profile_is_a_noop() {
        let (session, registry) = registry_for("a@x.com");
        assert!(registry.switch_profile("Nobody").is_none());
        assert!(session.current_profile().is_none());
    }
}
