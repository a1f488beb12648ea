use crate::errors::ConsoleError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Storage key holding the raw auth token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-encoded [`UserInfo`] blob.
pub const USER_KEY: &str = "user";

/// Persistent string key/value storage backing the session.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError>;
    fn remove(&self, key: &str) -> Result<(), ConsoleError>;
}

/// Key/value storage persisted as a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, ConsoleError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|e| {
            ConsoleError::Storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), ConsoleError> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| {
                    ConsoleError::Storage(format!(
                        "failed to remove {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConsoleError::Storage(format!(
                    "failed creating directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let payload = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, payload).map_err(|e| {
            ConsoleError::Storage(format!("failed writing {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> R) -> R {
        match self.entries.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.with_entries(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.with_entries(|entries| entries.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        self.with_entries(|entries| entries.remove(key));
        Ok(())
    }
}

/// Minimal operator details kept next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub user: Option<UserInfo>,
}

impl Session {
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

/// Reads and writes the two session keys.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Returns the stored session, if a non-empty token is present.
    pub fn load(&self) -> Result<Option<Session>, ConsoleError> {
        let token = match self.storage.get(TOKEN_KEY)? {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Ok(None),
        };

        let user = match self.storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<UserInfo>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable user info in session storage");
                    None
                }
            },
            None => None,
        };

        Ok(Some(Session { token, user }))
    }

    pub fn save(&self, session: &Session) -> Result<(), ConsoleError> {
        self.storage.set(TOKEN_KEY, &session.token)?;
        match &session.user {
            Some(user) => self.storage.set(USER_KEY, &serde_json::to_string(user)?),
            None => self.storage.remove(USER_KEY),
        }
    }

    /// Removes both the token and the user info.
    pub fn clear(&self) -> Result<(), ConsoleError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }
}
