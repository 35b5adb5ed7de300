//! Key-value persistence for the draft roster.

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::draft::DraftRosterState;

/// Key the roster is stored under. The suffix tracks the entity shape.
pub const STORAGE_KEY: &str = "apexdraft-storage-v2";

/// Version written inside the record envelope.
pub const STORAGE_VERSION: u32 = 0;

/// Root directory under the user's data directory used for the store.
pub const DEFAULT_STORAGE_DIR: &str = "apexdraft";

/// Failures talking to a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        /// File involved in the failed operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The roster could not be encoded.
    #[error("failed to serialise draft state: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Backend refused the write (e.g. quota).
    #[error("storage rejected write: {0}")]
    Rejected(String),
}

/// Durable string key-value surface the draft store persists through.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Backend keeping one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_STORAGE_DIR)
    }

    /// Directory holding the key files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_component(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;

        // Write beside the target and rename so a crash never leaves half a record.
        let mut staged =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;
        staged
            .write_all(value.as_bytes())
            .map_err(|source| StorageError::Io {
                path: staged.path().to_path_buf(),
                source,
            })?;
        staged.persist(&path).map_err(|err| StorageError::Io {
            path: path.clone(),
            source: err.error,
        })?;
        debug!(path = %path.display(), "stored key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Serialized record stored under [`STORAGE_KEY`].
#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    state: DraftRosterState,
    version: u32,
}

/// Encode the roster into its stored form.
pub fn encode_state(state: &DraftRosterState) -> Result<String, StorageError> {
    let record = PersistedRecord {
        state: state.clone(),
        version: STORAGE_VERSION,
    };
    Ok(serde_json::to_string(&record)?)
}

/// Decode a stored record. Anything unusable yields `None`.
pub fn decode_state(raw: &str) -> Option<DraftRosterState> {
    let record: PersistedRecord = match serde_json::from_str(raw) {
        Ok(record) => record,
        Err(err) => {
            warn!("Discarding malformed draft record: {err}");
            return None;
        }
    };
    if record.version != STORAGE_VERSION {
        warn!(
            version = record.version,
            expected = STORAGE_VERSION,
            "Discarding draft record with unknown version"
        );
        return None;
    }
    if let Err(reason) = record.state.validate() {
        warn!("Discarding draft record that breaks roster rules: {reason}");
        return None;
    }
    Some(record.state)
}

/// Read the roster from `storage`, falling back to an empty roster.
pub fn load_state(storage: &dyn KeyValueStore) -> DraftRosterState {
    match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => decode_state(&raw).unwrap_or_default(),
        Ok(None) => DraftRosterState::default(),
        Err(err) => {
            warn!("Failed to read stored draft: {err}");
            DraftRosterState::default()
        }
    }
}

/// Write the roster to `storage`.
pub fn save_state(
    storage: &mut dyn KeyValueStore,
    state: &DraftRosterState,
) -> Result<(), StorageError> {
    let encoded = encode_state(state)?;
    storage.set(STORAGE_KEY, &encoded)
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "store".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Constructor, Driver},
        money::Price,
    };
    use tempfile::tempdir;

    fn sample_state() -> DraftRosterState {
        let mut state = DraftRosterState::default();
        state.drafted_drivers = vec![
            Driver::new(44, "Lewis Hamilton", "Mercedes", Price::from_tenths(185)),
            Driver::new(1, "Max Verstappen", "Red Bull Racing", Price::from_tenths(305)),
        ];
        state.drafted_constructors = vec![Constructor::new(3, "McLaren", Price::from_tenths(250))];
        state
    }

    #[test]
    fn file_store_round_trip() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(STORAGE_KEY)?, None);

        let state = sample_state();
        save_state(&mut store, &state)?;
        assert!(store.path_for(STORAGE_KEY).exists());
        assert_eq!(
            store.path_for(STORAGE_KEY).file_name().and_then(|n| n.to_str()),
            Some("apexdraft-storage-v2.json")
        );

        let restored = load_state(&store);
        assert_eq!(restored, state);
        assert_eq!(restored.drafted_drivers[0].id, 44);

        store.remove(STORAGE_KEY)?;
        store.remove(STORAGE_KEY)?;
        assert_eq!(load_state(&store), DraftRosterState::default());
        Ok(())
    }

    #[test]
    fn record_uses_versioned_envelope() -> anyhow::Result<()> {
        let encoded = encode_state(&sample_state())?;
        let value: serde_json::Value = serde_json::from_str(&encoded)?;
        assert_eq!(value["version"], serde_json::json!(0));
        assert_eq!(value["state"]["draftedDrivers"][1]["name"], "Max Verstappen");
        assert_eq!(value["state"]["draftedConstructors"][0]["price"], 25.0);
        Ok(())
    }

    #[test]
    fn unusable_records_fall_back_to_empty() {
        let mut store = MemoryStore::new();
        for raw in [
            "not json",
            r#"{"state": {"draftedDrivers": "nope"}, "version": 0}"#,
            r#"{"state": {"draftedDrivers": [], "draftedConstructors": []}, "version": 7}"#,
            r#"{"state": {"draftedDrivers": [{"id": 1, "name": "A", "teamName": "T", "price": 101}], "draftedConstructors": []}, "version": 0}"#,
        ] {
            store.set(STORAGE_KEY, raw).unwrap();
            assert_eq!(load_state(&store), DraftRosterState::default(), "{raw}");
        }
    }

    #[test]
    fn records_under_other_keys_are_ignored() {
        let mut store = MemoryStore::new();
        let encoded = encode_state(&sample_state()).unwrap();
        store.set("apexdraft-storage-v1", &encoded).unwrap();
        assert_eq!(load_state(&store), DraftRosterState::default());
    }

    #[test]
    fn sanitize_creates_safe_filenames() {
        assert_eq!(sanitize_component("apex draft/../v2"), "apexdraftv2");
        assert_eq!(sanitize_component("../"), "store");
    }
}
