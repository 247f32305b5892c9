//! Persistent key-value storage for the access token.
//!
//! The login flow never touches a concrete store. It writes through the
//! `TokenStore` port so the backend can be chosen by configuration and
//! replaced in tests.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::{debug, warn};

use crate::config::{Config, TokenStorage};

/// Key the access token is stored under
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Keychain service name
const SERVICE_NAME: &str = "reletter";

/// Storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Storage port for persisted string values.
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Open the store selected in the configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.token_storage {
        TokenStorage::File => Arc::new(FileStore::new(config.data_dir()?.join(STORAGE_FILE))),
        TokenStorage::Keychain => Arc::new(KeychainStore),
        TokenStorage::Memory => Arc::new(MemoryStore::new()),
    };
    debug!(backend = ?config.token_storage, "Token store opened");
    Ok(store)
}

// ============================================================================
// File Store
// ============================================================================

/// JSON file holding a flat string map.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read storage file")?;
        Self::parse_map(&contents)
    }

    fn parse_map(contents: &str) -> Result<BTreeMap<String, String>> {
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(contents).context("Failed to parse storage file")
    }

    /// Replace the file contents via a sibling temp file and a rename
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents).context("Failed to write storage file")?;
        std::fs::rename(&tmp_path, &self.path).context("Failed to replace storage file")?;
        Ok(())
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        let mut map = if self.path.exists() {
            let contents =
                std::fs::read_to_string(&self.path).context("Failed to read storage file")?;
            Self::parse_map(&contents).unwrap_or_else(|e| {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Storage file unreadable, starting over"
                );
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }
}

// ============================================================================
// Keychain Store
// ============================================================================

/// OS keychain, one entry per key.
pub struct KeychainStore;

impl KeychainStore {
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read value from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store value in keychain")
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-process map. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
