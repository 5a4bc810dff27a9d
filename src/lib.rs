//! Recall: a repeat-the-sequence memory game engine.
//!
//! The device shows a growing sequence of signals, the player repeats it,
//! and every lost game is scored and stored. The engine is a pure state
//! machine: it never sleeps and never touches storage. Timing and
//! persistence live in the shell around it.
//!
//! # Core Concepts
//!
//! - **Engine**: [`SequenceEngine`] generates steps, validates input and
//!   returns timed playback schedules
//! - **Scheduler**: [`scheduler::VirtualClock`] fires scheduled cues back
//!   into the engine
//! - **Scores**: [`ScoreRecorder`] persists final scores through a
//!   [`scores::ScoreStore`] and owns the score history
//! - **Session**: [`GameSession`] wires all of the above together
//!
//! # Example
//!
//! ```rust
//! use recall::core::RoundState;
//! use recall::engine::{EngineConfig, ScriptedSource, SequenceEngine, Signal, SubmitOutcome};
//! use recall::scores::{MemoryStore, ScoreRecorder};
//! use recall::session::{DisplayLog, GameSession};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let engine = SequenceEngine::with_source(EngineConfig::default(), ScriptedSource::new([0, 1]));
//! let mut session = GameSession::new(engine, ScoreRecorder::new(MemoryStore::new()), DisplayLog::new());
//!
//! session.start().unwrap();
//! session.run_until_idle();
//! session.press(Signal::new("red")).await.unwrap();
//!
//! // The next round replays red, then adds blue.
//! session.run_until_idle();
//! assert_eq!(session.engine().sequence(), &[Signal::new("red"), Signal::new("blue")]);
//!
//! session.press(Signal::new("red")).await.unwrap();
//! let outcome = session.press(Signal::new("green")).await.unwrap();
//!
//! assert!(matches!(outcome, SubmitOutcome::RoundLost(score) if score.value() == 1));
//! assert_eq!(session.state(), RoundState::RoundLost);
//! assert_eq!(session.history().best().map(|r| r.score), Some(1));
//! # }
//! ```

pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod scheduler;
pub mod scores;
pub mod session;

// Re-export commonly used types
pub use crate::core::{RoundState, State};
pub use engine::{EngineConfig, EngineError, Score, SequenceEngine, Signal, SubmitOutcome};
pub use scores::{ScoreRecorder, StorageError};
pub use session::{GameSession, SessionError};
