use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blob key of the current day bucket
pub const DAY_BUCKET_KEY: &str = "phone-recharge-data";
/// Blob key of the closed-day history
pub const HISTORY_KEY: &str = "phone-recharge-history";
/// Blob key of the registered accounts
pub const USERS_KEY: &str = "phone-recharge-users";

/// JsonConnection owns the data directory and reads/writes named JSON blobs
#[derive(Clone, Debug)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File backing a blob key
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", key))
    }

    /// Read a blob. Returns `None` when the blob has never been written
    pub fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.blob_path(key);

        if !path.exists() {
            debug!("Blob {} not found at {:?}", key, path);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read blob {}", key))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Blob {} is not valid JSON", key))?;
        Ok(Some(value))
    }

    /// Replace a blob wholesale
    pub fn write_blob<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.blob_path(key);
        let content = serde_json::to_string_pretty(value)?;

        // Atomic write using temp file
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).with_context(|| format!("Failed to write blob {}", key))?;
        fs::rename(&temp_path, &path).with_context(|| format!("Failed to replace blob {}", key))?;

        debug!("Wrote blob {} to {:?}", key, path);
        Ok(())
    }
}
