use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Credential fields for one provider (e.g. `access_token`).
pub type AuthDetails = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("persist error: {0}")]
    Persist(String),
}

impl From<StoreError> for crate::error::RecFixError {
    fn from(e: StoreError) -> Self {
        crate::error::RecFixError::Config(e.to_string())
    }
}

pub trait AuthStore: Send + Sync {
    fn load(&self, provider: &str) -> Option<AuthDetails>;
    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError>;
    fn remove(&self, provider: &str) -> Result<bool, StoreError>;
}

/// A simple in-memory store, mainly for testing.
pub struct MemoryAuthStore {
    map: std::sync::Mutex<HashMap<String, AuthDetails>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self {
            map: std::sync::Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore for MemoryAuthStore {
    fn load(&self, provider: &str) -> Option<AuthDetails> {
        self.map.lock().ok()?.get(provider).cloned()
    }
    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError> {
        self.map
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))?
            .insert(provider.to_string(), auth.clone());
        Ok(())
    }
    fn remove(&self, provider: &str) -> Result<bool, StoreError> {
        Ok(self
            .map
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))?
            .remove(provider)
            .is_some())
    }
}

/// A JSON file store at `~/.config/recfix/auth.json` (Unix) or
/// `%APPDATA%/recfix/auth.json` (Windows).
pub struct FileAuthStore {
    path: PathBuf,
}

impl FileAuthStore {
    pub fn new_default() -> Self {
        let dir = crate::config::config_dir();
        std::fs::create_dir_all(&dir).ok();
        Self {
            path: dir.join("auth.json"),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_map().into_keys().collect();
        names.sort();
        names
    }

    fn read_map(&self) -> HashMap<String, AuthDetails> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }

    fn write_map(&self, map: &HashMap<String, AuthDetails>) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Persist(format!("serde: {}", e)))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        std::fs::write(&self.path, &s).map_err(|e| StoreError::Persist(e.to_string()))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| StoreError::Persist(format!("chmod: {}", e)))?;
        }

        Ok(())
    }
}

impl AuthStore for FileAuthStore {
    fn load(&self, provider: &str) -> Option<AuthDetails> {
        self.read_map().get(provider).cloned()
    }

    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError> {
        let mut map = self.read_map();
        map.insert(provider.to_string(), auth.clone());
        self.write_map(&map)
    }

    fn remove(&self, provider: &str) -> Result<bool, StoreError> {
        let mut map = self.read_map();
        let removed = map.remove(provider).is_some();
        if removed {
            self.write_map(&map)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::at(dir.path().join("nested").join("auth.json"));
        assert!(store.load("youtube").is_none());

        let mut auth = AuthDetails::new();
        auth.insert("access_token".into(), "tok".into());
        store.save("youtube", &auth).unwrap();

        assert_eq!(
            store.load("youtube").unwrap().get("access_token").unwrap(),
            "tok"
        );
        assert_eq!(store.list_providers(), vec!["youtube".to_string()]);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.config_path())
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        assert!(store.remove("youtube").unwrap());
        assert!(!store.remove("youtube").unwrap());
        assert!(store.load("youtube").is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryAuthStore::default();
        let mut auth = AuthDetails::new();
        auth.insert("k".into(), "v".into());
        store.save("p", &auth).unwrap();
        assert_eq!(store.load("p"), Some(auth));
        assert!(store.remove("p").unwrap());
    }
}
