//! Engine error types.

use crate::core::RoundState;
use crate::engine::schedule::RoundToken;
use thiserror::Error;

/// Errors returned by engine operations.
///
/// Both variants are recoverable: the rejected call changed nothing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("'{operation}' is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: RoundState,
    },

    #[error("cue from round {found} arrived during round {current}")]
    StaleRound {
        current: RoundToken,
        found: RoundToken,
    },
}
