//! State trait and the game's round states.
//!
//! States are plain values with pure inspection methods. The engine keeps
//! exactly one [`RoundState`] active at a time.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. States are cloneable and serializable so they can
/// be recorded in a [`StateHistory`](super::StateHistory) and captured in
/// snapshots.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition records
/// - `PartialEq`: guards and tests compare states
/// - `Debug`: states appear in errors and logs
/// - `Serialize` + `Deserialize`: states are part of snapshots
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final state.
    ///
    /// Final states require an explicit external action to leave.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Authoritative state of a game round.
///
/// ```text
/// Idle --start--> Revealing --ready--> AwaitingInput
/// AwaitingInput --submit(match, incomplete)--> AwaitingInput
/// AwaitingInput --submit(mismatch)--> RoundLost
/// AwaitingInput --submit(match, complete)--> RoundWon --next round--> Revealing
/// RoundLost --start--> Revealing
/// ```
///
/// # Example
///
/// ```rust
/// use recall::core::{RoundState, State};
///
/// assert!(RoundState::Idle.accepts_start());
/// assert!(!RoundState::Revealing.accepts_start());
/// assert!(RoundState::RoundLost.is_final());
/// assert_eq!(RoundState::AwaitingInput.name(), "AwaitingInput");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// No game has been played yet
    Idle,
    /// The sequence is being shown to the player
    Revealing,
    /// The player is reproducing the sequence
    AwaitingInput,
    /// The player reproduced the full sequence; the next round follows
    RoundWon,
    /// The player made a mistake; a new game needs an explicit start
    RoundLost,
}

impl RoundState {
    /// Whether a round may be started from this state.
    ///
    /// Only one round can be in flight, so `Revealing` and `AwaitingInput`
    /// refuse.
    pub fn accepts_start(&self) -> bool {
        matches!(self, Self::Idle | Self::RoundWon | Self::RoundLost)
    }

    /// Whether player input is accepted in this state.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    /// Whether a round is currently in flight.
    pub fn in_flight(&self) -> bool {
        matches!(self, Self::Revealing | Self::AwaitingInput)
    }
}

impl State for RoundState {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Revealing => "Revealing",
            Self::AwaitingInput => "AwaitingInput",
            Self::RoundWon => "RoundWon",
            Self::RoundLost => "RoundLost",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::RoundLost)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::RoundLost)
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
