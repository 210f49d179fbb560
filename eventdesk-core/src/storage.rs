//! Key-value storage backends for the event store.
//!
//! The store only needs to read and replace a single string value under a
//! key, which is all browser local storage offers too.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{EventDeskError, EventDeskResult};

/// A durable string-valued key-value store.
pub trait KeyValueStorage {
    /// Read the value under `key`. `Ok(None)` if nothing was ever stored.
    fn get(&self, key: &str) -> EventDeskResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> EventDeskResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> EventDeskResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> EventDeskResult<()> {
        (**self).set(key, value)
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> EventDeskResult<Option<String>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> EventDeskResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            EventDeskError::Persistence(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        // Write then rename so a crash never leaves half a file behind
        std::fs::write(&temp, value).map_err(|e| {
            EventDeskError::Persistence(format!("Could not write {}: {e}", temp.display()))
        })?;
        std::fs::rename(&temp, &path).map_err(|e| {
            EventDeskError::Persistence(format!("Could not replace {}: {e}", path.display()))
        })?;

        Ok(())
    }
}

/// In-process storage. Clones share the same map, so a clone handed to a
/// second store behaves like the same storage seen after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> EventDeskResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| EventDeskError::Persistence("memory storage lock poisoned".into()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> EventDeskResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> EventDeskResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
