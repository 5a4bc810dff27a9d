//! Snapshots of an engine mid-game.
//!
//! A snapshot holds the game state but not the configuration or random
//! source; restoring pairs it with both again (see
//! [`SequenceEngine::restore`](crate::engine::SequenceEngine::restore)).
//! Pending cues are not captured: a restored engine that is revealing or
//! has just won needs its cues scheduled again, which
//! [`GameSession::resume`](crate::session::GameSession::resume) does.

use crate::core::{RoundState, StateHistory};
use crate::engine::{Alphabet, RoundToken, Signal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable capture of an engine's game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub state: RoundState,

    /// Signals revealed so far, in order
    pub sequence: Vec<Signal>,

    /// Signals the player has entered this round
    pub input: Vec<Signal>,

    /// Token of the current round
    pub token: RoundToken,

    /// Complete transition history
    pub history: StateHistory<RoundState>,
}

impl EngineSnapshot {
    pub(crate) fn capture(
        state: RoundState,
        sequence: Vec<Signal>,
        input: Vec<Signal>,
        token: RoundToken,
        history: StateHistory<RoundState>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            state,
            sequence,
            input,
            token,
            history,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode {
            format: "json",
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(|e| SnapshotError::Decode {
            format: "json",
            reason: e.to_string(),
        })?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode {
            format: "bincode",
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode {
            format: "bincode",
            reason: e.to_string(),
        })?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Check that the snapshot describes a reachable game state for this
    /// alphabet.
    pub fn validate(&self, alphabet: &Alphabet) -> Result<(), SnapshotError> {
        self.check_version()?;

        if let Some(unknown) = self.sequence.iter().find(|s| !alphabet.contains(s)) {
            return Err(SnapshotError::UnknownSignal(unknown.to_string()));
        }
        if self.input.len() > self.sequence.len() {
            return Err(SnapshotError::InputTooLong {
                input: self.input.len(),
                sequence: self.sequence.len(),
            });
        }
        if self.state != RoundState::Idle && self.token == RoundToken::default() {
            return Err(SnapshotError::MissingToken(self.state));
        }

        let matched = self
            .input
            .iter()
            .zip(&self.sequence)
            .take_while(|(given, expected)| given == expected)
            .count();
        let all_matched = matched == self.input.len();

        let consistent = match self.state {
            RoundState::Idle => self.sequence.is_empty() && self.input.is_empty(),
            RoundState::Revealing => !self.sequence.is_empty() && self.input.is_empty(),
            RoundState::AwaitingInput => {
                !self.sequence.is_empty() && all_matched && self.input.len() < self.sequence.len()
            }
            RoundState::RoundWon => !self.sequence.is_empty() && self.input == self.sequence,
            RoundState::RoundLost => {
                !self.input.is_empty() && matched == self.input.len() - 1
            }
        };

        if consistent {
            Ok(())
        } else {
            Err(SnapshotError::InconsistentState {
                state: self.state,
                sequence: self.sequence.len(),
                input: self.input.len(),
            })
        }
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            })
        }
    }
}
