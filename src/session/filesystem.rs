use super::storage::DurableStorage;
use crate::error::{ClinicError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const SESSION_FILE_NAME: &str = "session.json";

/// Session slots stored as one JSON object file on disk.
pub struct FilesystemStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilesystemStorage {
    /// Storage rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage in `~/.cache/clinic-assist`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(default_storage_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(slots)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ClinicError::StorageError("session file lock poisoned".to_string()))?;
        let mut slots = self.read_slots().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "replacing unreadable session file");
            BTreeMap::new()
        });
        apply(&mut slots);
        self.write_slots(&slots)
    }
}

impl DurableStorage for FilesystemStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_slots() {
            Ok(mut slots) => slots.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|slots| {
            slots.remove(key);
        })
    }
}

pub fn default_storage_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ClinicError::StorageError("home directory not found".to_string()))?;
    Ok(home.join(".cache").join("clinic-assist"))
}
