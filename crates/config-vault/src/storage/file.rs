//! File storage backend
//!
//! Keeps every key in one JSON file in the user's data directory. The
//! credential store only ever writes encrypted envelopes here.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{Result, VaultError};

/// Name of the backing file inside the storage directory
const STORE_FILE_NAME: &str = "config-store.json";

/// On-disk file format
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// JSON file storage backend
pub struct FileStore {
    /// Directory for the store file
    storage_dir: PathBuf,
    /// In-memory mirror of the file
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store in the platform data directory
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::default_storage_dir()?)
    }

    /// Open the store in a custom directory (for testing or embedding)
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        let entries = Self::read_file(&storage_dir.join(STORE_FILE_NAME))?;
        debug!(
            "File storage opened at {:?} with {} entries",
            storage_dir,
            entries.len()
        );

        Ok(Self {
            storage_dir,
            entries: RwLock::new(entries),
        })
    }

    /// Get the default storage directory
    fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "api-config-vault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| VaultError::Storage("Could not determine data directory".to_string()))
    }

    fn read_file(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            debug!("No existing store file found");
            return Ok(HashMap::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&contents)
            .map_err(|e| VaultError::Storage(format!("Corrupt store file: {}", e)))?;
        Ok(file.entries)
    }

    /// Get the path to the store file
    pub fn file_path(&self) -> PathBuf {
        self.storage_dir.join(STORE_FILE_NAME)
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Write the given entries to disk
    async fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let file = StoreFile {
            version: 1,
            entries: entries.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} entries to storage", entries.len());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        let previous = entries.insert(key.to_string(), value.to_string());

        // Roll back the mirror if the disk write fails
        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(old) = entries.remove(key) {
            if let Err(e) = self.persist(&entries).await {
                entries.insert(key.to_string(), old);
                return Err(e);
            }
            debug!("Deleted key: {}", key);
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "File Storage"
    }
}
