use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracker_core::{ParseStatusError, Status};

use crate::PersistError;

/// Key selection for [`StatusStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    All,
    Only(Vec<String>),
}

impl Keys {
    pub fn one(address: impl Into<String>) -> Self {
        Keys::Only(vec![address.into()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Broadcast after every mutation that changed at least one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreChange {
    pub changes: BTreeMap<String, ValueChange>,
}

impl StoreChange {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("stored value for {address} is not a status: {source}")]
    UnrecognizedStatus {
        address: String,
        #[source]
        source: ParseStatusError,
    },
    #[error("failed to persist store: {0}")]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Shared key-value store mapping addresses to status tokens.
///
/// Last write wins; there are no transactions. Subscribers, including the
/// mutating party, see every effective mutation.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get(&self, keys: Keys) -> Result<BTreeMap<String, String>, StoreError>;

    async fn set(&self, entries: BTreeMap<String, String>) -> Result<(), StoreError>;

    async fn remove(&self, keys: Vec<String>) -> Result<(), StoreError>;

    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;

    /// Status of a single address; a missing key is `NotVisited`.
    async fn status_of(&self, address: &str) -> Result<Status, StoreError> {
        let mut found = self.get(Keys::one(address)).await?;
        match found.remove(address) {
            None => Ok(Status::NotVisited),
            Some(token) => token
                .parse()
                .map_err(|source| StoreError::UnrecognizedStatus {
                    address: address.to_string(),
                    source,
                }),
        }
    }

    /// Assigns a status. `NotVisited` is stored as absence.
    async fn write_status(&self, address: &str, status: Status) -> Result<(), StoreError> {
        match status {
            Status::NotVisited => self.remove(vec![address.to_string()]).await,
            Status::Ongoing | Status::Completed => {
                let entry = (address.to_string(), status.as_token().to_string());
                self.set(BTreeMap::from([entry])).await
            }
        }
    }
}
