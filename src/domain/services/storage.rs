#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StorageKey {
    SessionID,
}

/// Small key/value store persisted as a JSON object, standing in for the
/// browser's local storage.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    pub storage_dir: path::PathBuf,
}

impl Default for LocalStorage {
    fn default() -> LocalStorage {
        return LocalStorage::new(path::PathBuf::from(Config::get(ConfigKey::StorageDir)));
    }
}

impl LocalStorage {
    pub fn new(storage_dir: path::PathBuf) -> LocalStorage {
        return LocalStorage { storage_dir };
    }

    fn file_path(&self) -> path::PathBuf {
        return self.storage_dir.join("storage.json");
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let payload = fs::read_to_string(file_path).await?;
        if payload.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        return Ok(serde_json::from_str(&payload)?);
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if !self.storage_dir.exists() {
            fs::create_dir_all(&self.storage_dir).await?;
        }

        let payload = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(self.file_path()).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;

        return Ok(());
    }

    pub async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let entries = self.read_all().await?;
        return Ok(entries.get(&key.to_string()).cloned());
    }

    pub async fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        tracing::debug!(key = key.to_string(), "storage set");

        return self.write_all(&entries).await;
    }
}
