//! Durable key-value mirror for locally created records.
//!
//! One JSON text file per fixed key under a store directory. An absent
//! entry reads as an empty collection; saves overwrite the whole entry.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::contract::model::{Post, User};
use crate::domain::ports::CustomStore;

const CUSTOM_USERS_KEY: &str = "custom_users";
const CUSTOM_POSTS_KEY: &str = "custom_posts";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failure for key '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("malformed stored value under key '{key}': {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed store: `<dir>/<key>.json` per entry. The directory is
/// created lazily on first save, so a fresh store reads as empty without
/// touching the filesystem.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn load_entry<T: DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Vec<T>, StoreError> {
        let path = self.entry_path(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io { key, source: e }),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Malformed { key, source: e })
    }

    async fn save_entry<T: Serialize>(
        &self,
        key: &'static str,
        records: &[T],
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(records)
            .map_err(|e| StoreError::Encode { key, source: e })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io { key, source: e })?;

        // Write-then-rename so a torn write cannot corrupt the entry.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, text.as_bytes())
            .await
            .map_err(|e| StoreError::Io { key, source: e })?;
        tokio::fs::rename(&tmp, self.entry_path(key))
            .await
            .map_err(|e| StoreError::Io { key, source: e })
    }
}

#[async_trait]
impl CustomStore for JsonFileStore {
    async fn load_custom_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.load_entry(CUSTOM_USERS_KEY).await?)
    }

    async fn load_custom_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(self.load_entry(CUSTOM_POSTS_KEY).await?)
    }

    async fn save_custom_users(&self, users: &[User]) -> anyhow::Result<()> {
        Ok(self.save_entry(CUSTOM_USERS_KEY, users).await?)
    }

    async fn save_custom_posts(&self, posts: &[Post]) -> anyhow::Result<()> {
        Ok(self.save_entry(CUSTOM_POSTS_KEY, posts).await?)
    }
}
