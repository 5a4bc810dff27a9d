//! The storage collaborator and an in-memory implementation.

use crate::scores::error::StorageError;
use crate::scores::record::{RecordId, ScoreRecord};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key-value/document store holding score records.
///
/// Implementations talk to whatever backend holds the scores, usually over
/// the network. Neither operation is retried by callers in this crate.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist one record and return its new identifier.
    async fn insert(&self, record: ScoreRecord) -> Result<RecordId, StorageError>;

    /// Read every stored record.
    async fn list_all(&self) -> Result<Vec<ScoreRecord>, StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: Vec<(RecordId, ScoreRecord)>,
    offline: bool,
}

/// Shared in-memory store. Clones share the same records.
///
/// Switching it offline makes every call fail with
/// [`StorageError::Unavailable`], which is how outages are simulated.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.offline = offline;
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a record by the id `insert` returned.
    pub fn get(&self, id: RecordId) -> Option<ScoreRecord> {
        let inner = self.inner.lock().ok()?;
        inner
            .records
            .iter()
            .find(|(stored, _)| *stored == id)
            .map(|(_, record)| *record)
    }

    fn online(&self) -> Result<MutexGuard<'_, MemoryInner>, StorageError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        if inner.offline {
            return Err(StorageError::Unavailable("memory store is offline".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn insert(&self, record: ScoreRecord) -> Result<RecordId, StorageError> {
        let mut inner = self.online()?;
        let id = RecordId::new_v4();
        inner.records.push((id, record));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        let inner = self.online()?;
        Ok(inner.records.iter().map(|(_, record)| *record).collect())
    }
}

#[async_trait]
impl<S: ScoreStore + ?Sized> ScoreStore for Arc<S> {
    async fn insert(&self, record: ScoreRecord) -> Result<RecordId, StorageError> {
        (**self).insert(record).await
    }

    async fn list_all(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        (**self).list_all().await
    }
}
