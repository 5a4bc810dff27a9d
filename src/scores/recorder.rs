//! Score recorder: persists final scores and owns the score history.

use crate::engine::Score;
use crate::scores::error::StorageError;
use crate::scores::record::{RecordId, ScoreHistory, ScoreRecord};
use crate::scores::store::ScoreStore;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};

/// Persists scores through a [`ScoreStore`] and keeps the last fetched
/// [`ScoreHistory`].
///
/// Writes are at-most-once: `record` is never retried here and carries no
/// deduplication key, so a caller that retries after an error may store the
/// same score twice. Concurrent `record` calls are not serialized.
///
/// The history is only ever replaced by [`fetch_history`](Self::fetch_history);
/// callers get clones, never a mutable handle.
///
/// # Example
///
/// ```rust
/// use recall::engine::Score;
/// use recall::scores::{MemoryStore, ScoreRecorder};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut recorder = ScoreRecorder::new(MemoryStore::new());
/// recorder.record(Score::completed_rounds(4)).await.unwrap();
///
/// let history = recorder.fetch_history().await.unwrap();
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.best().map(|r| r.score), Some(3));
/// # }
/// ```
#[derive(Debug)]
pub struct ScoreRecorder<St> {
    store: St,
    history: ScoreHistory,
}

impl<St> ScoreRecorder<St>
where
    St: ScoreStore + Clone + Send + Sync + 'static,
{
    /// Create a recorder with an empty local history.
    pub fn new(store: St) -> Self {
        Self {
            store,
            history: ScoreHistory::default(),
        }
    }

    /// Persist a final score with its creation timestamp.
    pub async fn record(&self, score: Score) -> Result<RecordId, StorageError> {
        let record = ScoreRecord::from(score);

        match insert_record::<St>(record).run(&self.store).await {
            Ok(id) => {
                info!(score = record.score, record_id = %id, "Score recorded");
                Ok(id)
            }
            Err(error) => {
                warn!(score = record.score, %error, "Failed to record score");
                Err(error)
            }
        }
    }

    /// Replace the local history with everything the store holds.
    ///
    /// On failure the previous history is kept.
    pub async fn fetch_history(&mut self) -> Result<ScoreHistory, StorageError> {
        let records = match list_records::<St>().run(&self.store).await {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "Failed to fetch score history");
                return Err(error);
            }
        };

        debug!(records = records.len(), "Score history fetched");
        self.history = ScoreHistory::new(records);
        Ok(self.history.clone())
    }

    /// The history as of the last successful fetch.
    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn store(&self) -> &St {
        &self.store
    }
}

fn insert_record<St>(
    record: ScoreRecord,
) -> impl Effect<Output = RecordId, Error = StorageError, Env = St>
where
    St: ScoreStore + Clone + Send + Sync + 'static,
{
    from_async(move |store: &St| {
        let store = store.clone();
        async move { store.insert(record).await }
    })
}

fn list_records<St>() -> impl Effect<Output = Vec<ScoreRecord>, Error = StorageError, Env = St>
where
    St: ScoreStore + Clone + Send + Sync + 'static,
{
    from_async(|store: &St| {
        let store = store.clone();
        async move { store.list_all().await }
    })
}
