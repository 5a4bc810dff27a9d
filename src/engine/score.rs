//! Final score of a lost game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rounds fully completed before the first wrong input, stamped
/// with the moment the game was lost.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Score {
    value: u32,
    created_at: DateTime<Utc>,
}

impl Score {
    pub fn new(value: u32, created_at: DateTime<Utc>) -> Self {
        Self { value, created_at }
    }

    /// Score for a mismatch while a sequence of `sequence_len` signals was
    /// in play: every round before the current one was completed.
    ///
    /// # Panics
    ///
    /// Panics if `sequence_len` is zero; a mismatch without a sequence means
    /// the state machine is broken.
    pub fn completed_rounds(sequence_len: usize) -> Self {
        assert!(
            sequence_len > 0,
            "mismatch recorded while the sequence was empty"
        );
        let value = u32::try_from(sequence_len - 1).unwrap_or(u32::MAX);
        Self::new(value, Utc::now())
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_round_failure_scores_zero() {
        assert_eq!(Score::completed_rounds(1).value(), 0);
    }

    #[test]
    fn score_counts_completed_rounds() {
        assert_eq!(Score::completed_rounds(3).value(), 2);
    }

    #[test]
    #[should_panic(expected = "sequence was empty")]
    fn empty_sequence_is_a_bug() {
        let _ = Score::completed_rounds(0);
    }

    #[test]
    fn timestamp_is_set_at_creation() {
        let before = Utc::now();
        let score = Score::completed_rounds(2);
        assert!(score.created_at() >= before);
        assert!(score.created_at() <= Utc::now());
    }
}
