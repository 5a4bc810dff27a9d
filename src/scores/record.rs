//! Stored score documents and the history built from them.

use crate::engine::Score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned by the store to an inserted record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The document persisted for each lost game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

impl From<Score> for ScoreRecord {
    fn from(score: Score) -> Self {
        Self {
            score: score.value(),
            timestamp: score.created_at(),
        }
    }
}

/// Snapshot of every stored score, in the order the store returned them.
///
/// That order is the store's own (usually insertion order) and is not
/// guaranteed to be chronological.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ScoreHistory {
    records: Vec<ScoreRecord>,
}

impl ScoreHistory {
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRecord> {
        self.records.iter()
    }

    /// Highest score; the earliest stored one wins ties.
    pub fn best(&self) -> Option<&ScoreRecord> {
        self.records
            .iter()
            .rev()
            .max_by_key(|record| record.score)
    }
}

impl<'a> IntoIterator for &'a ScoreHistory {
    type Item = &'a ScoreRecord;
    type IntoIter = std::slice::Iter<'a, ScoreRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(score: u32, minutes_ago: i64) -> ScoreRecord {
        ScoreRecord {
            score,
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn record_copies_score_and_timestamp() {
        let score = Score::completed_rounds(5);
        let record = ScoreRecord::from(score);
        assert_eq!(record.score, 4);
        assert_eq!(record.timestamp, score.created_at());
    }

    #[test]
    fn best_prefers_earliest_on_ties() {
        let first = record(7, 30);
        let history = ScoreHistory::new(vec![record(2, 40), first, record(7, 10), record(1, 5)]);

        assert_eq!(history.best(), Some(&first));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn empty_history_has_no_best() {
        let history = ScoreHistory::default();
        assert!(history.is_empty());
        assert!(history.best().is_none());
    }

    #[test]
    fn history_keeps_store_order() {
        let records = vec![record(3, 1), record(1, 50), record(2, 20)];
        let history = ScoreHistory::new(records.clone());
        let scores: Vec<u32> = history.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![3, 1, 2]);
        assert_eq!(history.records(), records.as_slice());
    }

    #[test]
    fn record_serializes_as_score_and_timestamp() {
        let value = serde_json::to_value(record(4, 0)).unwrap();
        assert_eq!(value["score"], 4);
        assert!(value["timestamp"].is_string());
    }
}
