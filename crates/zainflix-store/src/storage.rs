use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Storage key layout. One document per key, shared by every store; the
/// per-user keys embed the user's email so data survives logout.
pub mod keys {
    pub const USER_SESSION: &str = "userSession";
    pub const SELECTED_PROFILE: &str = "selectedProfile";
    pub const REMEMBER_USER: &str = "rememberUser";
    pub const MY_LIST: &str = "zainflix_mylist";

    pub fn custom_profiles(user: &str) -> String {
        format!("customProfiles_{user}")
    }

    pub fn deleted_profiles(user: &str) -> String {
        format!("deletedProfiles_{user}")
    }
}

/// Persistent key-value substrate the state stores are built on. Reads and
/// writes are synchronous and atomic within one process; the substrate is
/// shared with other processes without any cross-process locking
/// (last writer wins).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one JSON document per key under a storage directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys embed emails; strip anything that would escape the directory
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and for injecting a fake substrate.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("userSession").unwrap(), None);

        store.set("userSession", r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(
            store.get("userSession").unwrap().as_deref(),
            Some(r#"{"email":"a@x.com"}"#)
        );

        store.remove("userSession").unwrap();
        assert_eq!(store.get("userSession").unwrap(), None);
        // Removing a missing key is not an error
        store.remove("userSession").unwrap();
    }

    #[test]
    fn test_file_store_keys_with_emails() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let key = keys::custom_profiles("a@x.com");
        store.set(&key, "{}").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
