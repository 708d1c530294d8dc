//! Durable token storage

use parking_lot::RwLock;
use std::collections::HashMap;

use adminboard_storage::{Database, Result};

/// Key of the bearer token entry
pub const TOKEN_KEY: &str = "token";
/// Key of the refresh credential entry
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// String key/value storage that outlives the process
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

impl TokenStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_credential(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_credential(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_credential(key)
    }
}

/// Process-local store, for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}
