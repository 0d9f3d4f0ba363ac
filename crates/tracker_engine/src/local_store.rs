use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracker_logging::{tracker_debug, tracker_info};

use crate::{AtomicFileWriter, Keys, StatusStore, StoreChange, StoreError, ValueChange};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Local status store, kept in memory and optionally mirrored to a JSON file.
///
/// The file holds one flat object of address to status token and is rewritten
/// atomically after every effective mutation. A mutation whose write fails
/// leaves both the map and the subscribers untouched.
pub struct LocalStore {
    entries: Mutex<BTreeMap<String, String>>,
    writer: Option<AtomicFileWriter>,
    changes: broadcast::Sender<StoreChange>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::with_entries(BTreeMap::new())
    }

    pub fn with_entries(entries: BTreeMap<String, String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: Mutex::new(entries),
            writer: None,
            changes,
        }
    }

    /// Opens a file-backed store. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => parse_entries(&path, &text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracker_info!("Opened status store {:?} with {} entries", path, entries.len());

        let mut store = Self::with_entries(entries);
        store.writer = Some(AtomicFileWriter::new(path));
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.writer.as_ref().map(AtomicFileWriter::target)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn select(&self, keys: Keys) -> BTreeMap<String, String> {
        let entries = self.lock();
        match keys {
            Keys::All => entries.clone(),
            Keys::Only(keys) => keys
                .into_iter()
                .filter_map(|key| entries.get(&key).map(|value| (key, value.clone())))
                .collect(),
        }
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>) -> StoreChange,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let change = apply(&mut next);
        if change.is_empty() {
            return Ok(());
        }

        if let Some(writer) = &self.writer {
            let content = serde_json::to_string_pretty(&next).map_err(|err| {
                StoreError::Unavailable(format!("failed to serialize store: {err}"))
            })?;
            writer.write(&content)?;
        }
        *guard = next;
        drop(guard);

        tracker_debug!("Store changed: {} key(s)", change.changes.len());
        // No receivers is not an error: nobody is observing yet.
        let _ = self.changes.send(change);
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn parse_entries(path: &Path, text: &str) -> Result<BTreeMap<String, String>, StoreError> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(text).map_err(|err| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[async_trait]
impl StatusStore for LocalStore {
    async fn get(&self, keys: Keys) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self.select(keys))
    }

    async fn set(&self, entries: BTreeMap<String, String>) -> Result<(), StoreError> {
        self.mutate(|map| {
            let mut change = StoreChange::default();
            for (key, value) in entries {
                let old_value = map.insert(key.clone(), value.clone());
                if old_value.as_deref() != Some(value.as_str()) {
                    change.changes.insert(
                        key,
                        ValueChange {
                            old_value,
                            new_value: Some(value),
                        },
                    );
                }
            }
            change
        })
    }

    async fn remove(&self, keys: Vec<String>) -> Result<(), StoreError> {
        self.mutate(|map| {
            let mut change = StoreChange::default();
            for key in keys {
                if let Some(old_value) = map.remove(&key) {
                    change.changes.insert(
                        key,
                        ValueChange {
                            old_value: Some(old_value),
                            new_value: None,
                        },
                    );
                }
            }
            change
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
