//! Session error types.

use crate::engine::{EngineError, Score};
use crate::scores::{RecordId, StorageError};
use thiserror::Error;

/// Errors surfaced by [`GameSession`](super::GameSession).
///
/// None of them leave the game in a different state than the engine
/// reports: a lost game whose score failed to save is still lost.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The game was lost but its score could not be stored
    #[error("Score {score} was not saved: {source}")]
    ScoreNotSaved {
        score: Score,
        #[source]
        source: StorageError,
    },

    /// The score was stored as `record`, but re-reading the history failed.
    /// Saving the score again would store it twice.
    #[error("Score {score} was saved as {record}, but the history is stale: {source}")]
    HistoryStale {
        score: Score,
        record: RecordId,
        #[source]
        source: StorageError,
    },

    /// Reading the score history failed
    #[error("Score history could not be refreshed: {0}")]
    History(#[from] StorageError),
}
