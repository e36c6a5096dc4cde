//! Persisted key/value store shared with the display surface.

use crate::error::HandoffError;
use crate::narrative::LetterPair;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const OPTIONS_KEY: &str = "options";
pub const LETTERS_KEY: &str = "letters";

/// String-keyed storage the handoff is built on.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError>;

    fn set(&self, key: &str, value: &str) -> Result<(), HandoffError>;

    fn remove(&self, key: &str) -> Result<(), HandoffError>;
}

/// One JSON file per key inside a directory. Writes go through a temporary
/// file and a rename so a reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn store_err(action: &str, path: &Path, e: &std::io::Error) -> HandoffError {
    HandoffError::Store(format!("failed to {action} {}: {e}", path.display()))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_err("read", &path, &e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HandoffError> {
        fs::create_dir_all(&self.dir).map_err(|e| store_err("create", &self.dir, &e))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| store_err("write", &tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| store_err("rename into", &path, &e))
    }

    fn remove(&self, key: &str) -> Result<(), HandoffError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_err("remove", &path, &e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, HandoffError> {
        self.entries
            .lock()
            .map_err(|_| HandoffError::Store("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HandoffError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HandoffError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// The two option labels, as shown next to each letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub option_a: String,
    pub option_b: String,
}

/// Everything a reader can see in the store at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedResult {
    pub options: Option<Options>,
    pub letters: Option<LetterPair>,
}

/// Typed view over a [`KeyValueStore`].
#[derive(Clone)]
pub struct HandoffStore {
    inner: Arc<dyn KeyValueStore>,
}

impl HandoffStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Remove both entries so no earlier session can be read back.
    pub fn clear(&self) -> Result<(), HandoffError> {
        self.inner.remove(LETTERS_KEY)?;
        self.inner.remove(OPTIONS_KEY)
    }

    pub fn write_options(&self, options: &Options) -> Result<(), HandoffError> {
        self.inner
            .set(OPTIONS_KEY, &serde_json::to_string(options)?)
    }

    pub fn write_letters(&self, letters: &LetterPair) -> Result<(), HandoffError> {
        self.inner
            .set(LETTERS_KEY, &serde_json::to_string(letters)?)
    }

    pub fn read_options(&self) -> Result<Option<Options>, HandoffError> {
        let Some(raw) = self.inner.get(OPTIONS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(options) => Ok(Some(options)),
            Err(e) => {
                tracing::debug!("ignoring undecodable options entry: {e}");
                Ok(None)
            }
        }
    }

    /// Letters count as ready only when they decode and both are non-empty.
    pub fn read_letters(&self) -> Result<Option<LetterPair>, HandoffError> {
        let Some(raw) = self.inner.get(LETTERS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<LetterPair>(&raw) {
            Ok(letters) if letters.is_complete() => Ok(Some(letters)),
            Ok(_) => {
                tracing::debug!("letters entry present but incomplete");
                Ok(None)
            }
            Err(e) => {
                tracing::debug!("ignoring undecodable letters entry: {e}");
                Ok(None)
            }
        }
    }

    pub fn read(&self) -> Result<PersistedResult, HandoffError> {
        Ok(PersistedResult {
            options: self.read_options()?,
            letters: self.read_letters()?,
        })
    }
}
