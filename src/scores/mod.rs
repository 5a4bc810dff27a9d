//! Score persistence.
//!
//! The engine hands each final [`Score`](crate::engine::Score) to a
//! [`ScoreRecorder`], which writes it through a [`ScoreStore`] and serves
//! the stored history back.
//!
//! Store calls run as Stillwater effects with the store as environment:
//! the recorder builds the effect, then runs it against its own store.

mod error;
mod record;
mod recorder;
mod store;

pub use error::StorageError;
pub use record::{RecordId, ScoreHistory, ScoreRecord};
pub use recorder::ScoreRecorder;
pub use store::{MemoryStore, ScoreStore};
