//! A playable game: engine, clock, display and recorder wired together.

use crate::core::RoundState;
use crate::engine::{
    Cue, CueOutcome, EngineError, GameRng, PlaybackSchedule, RoundToken, Score, SequenceEngine,
    Signal, SignalSource, SubmitOutcome,
};
use crate::scheduler::{CancelToken, Scheduler, VirtualClock};
use crate::scores::{RecordId, ScoreHistory, ScoreRecorder, ScoreStore};
use crate::session::display::SignalDisplay;
use crate::session::error::SessionError;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Something that happened while the session's clock advanced or a round
/// started.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: usize, token: RoundToken },
    Shown { index: usize, signal: Signal },
    InputOpened { round: usize },
}

/// Drives a [`SequenceEngine`] with a [`Scheduler`], sends playback to a
/// [`SignalDisplay`] and reports lost games to a [`ScoreRecorder`].
///
/// # Example
///
/// ```rust
/// use recall::engine::{EngineConfig, ScriptedSource, SequenceEngine, Signal, SubmitOutcome};
/// use recall::scores::{MemoryStore, ScoreRecorder};
/// use recall::session::{DisplayLog, GameSession};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let engine = SequenceEngine::with_source(EngineConfig::default(), ScriptedSource::new([2]));
/// let mut session = GameSession::new(engine, ScoreRecorder::new(MemoryStore::new()), DisplayLog::new());
///
/// session.start().unwrap();
/// session.advance(Duration::from_secs(1));
/// assert_eq!(session.display().shown(), vec![&Signal::new("green")]);
///
/// let outcome = session.press(Signal::new("red")).await.unwrap();
/// assert!(matches!(outcome, SubmitOutcome::RoundLost(_)));
/// assert_eq!(session.history().len(), 1);
/// # }
/// ```
pub struct GameSession<St, D, R = GameRng, C = VirtualClock<Cue>>
where
    R: SignalSource,
{
    engine: SequenceEngine<R>,
    recorder: ScoreRecorder<St>,
    display: D,
    clock: C,
    pending: Vec<CancelToken>,
}

impl<St, D, R> GameSession<St, D, R, VirtualClock<Cue>>
where
    St: ScoreStore + Clone + Send + Sync + 'static,
    D: SignalDisplay,
    R: SignalSource,
{
    /// Create a session driven by a fresh [`VirtualClock`].
    pub fn new(engine: SequenceEngine<R>, recorder: ScoreRecorder<St>, display: D) -> Self {
        Self::with_scheduler(engine, recorder, display, VirtualClock::new())
    }

    /// Create a session and load the stored score history before the first
    /// game, so earlier scores are visible straight away.
    ///
    /// If the history cannot be read the session is still returned, with an
    /// empty history, alongside the error.
    pub async fn open(
        engine: SequenceEngine<R>,
        recorder: ScoreRecorder<St>,
        display: D,
    ) -> (Self, Result<ScoreHistory, SessionError>) {
        let mut session = Self::new(engine, recorder, display);
        let loaded = session.refresh_history().await;
        (session, loaded)
    }
}

impl<St, D, R, C> GameSession<St, D, R, C>
where
    St: ScoreStore + Clone + Send + Sync + 'static,
    D: SignalDisplay,
    R: SignalSource,
    C: Scheduler<Cue>,
{
    pub fn with_scheduler(
        engine: SequenceEngine<R>,
        recorder: ScoreRecorder<St>,
        display: D,
        clock: C,
    ) -> Self {
        Self {
            engine,
            recorder,
            display,
            clock,
            pending: Vec::new(),
        }
    }

    /// Start a round (a new game unless the last round was won).
    ///
    /// Cues still pending from an earlier round are cancelled before the
    /// new playback is scheduled.
    pub fn start(&mut self) -> Result<GameEvent, EngineError> {
        let schedule = self.engine.start()?;
        self.cancel_pending();
        Ok(self.schedule_playback(schedule))
    }

    /// Schedule whatever the engine is waiting on, for an engine restored
    /// from a snapshot.
    ///
    /// A revealing engine replays its whole sequence and a won round gets
    /// its next-round cue back; pending cues are replaced either way. Other
    /// states wait on the player and need nothing.
    pub fn resume(&mut self) -> Option<GameEvent> {
        match self.engine.state() {
            RoundState::Revealing => {
                self.cancel_pending();
                let schedule = self.engine.playback();
                Some(self.schedule_playback(schedule))
            }
            RoundState::RoundWon => {
                self.cancel_pending();
                let next = self.engine.pending_next_round()?;
                let token = self.clock.schedule(next.delay, next.cue);
                self.pending.push(token);
                None
            }
            RoundState::Idle | RoundState::AwaitingInput | RoundState::RoundLost => None,
        }
    }

    /// Let `elapsed` pass on the clock and apply every cue that fires.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let deadline = self.clock.now().saturating_add(elapsed);
        let mut events = Vec::new();

        while let Some(cue) = self.clock.next_due(deadline) {
            match self.engine.on_cue(&cue) {
                CueOutcome::Show { index, signal } => {
                    self.display.show(&signal, index);
                    events.push(GameEvent::Shown { index, signal });
                }
                CueOutcome::InputOpened => {
                    self.display.ready();
                    events.push(GameEvent::InputOpened {
                        round: self.engine.round(),
                    });
                }
                CueOutcome::NextRound(schedule) => {
                    self.pending.clear();
                    events.push(self.schedule_playback(schedule));
                }
                CueOutcome::Stale => {
                    debug!(token = %cue.token(), "Dropped stale cue");
                }
            }
        }

        self.clock.advance_to(deadline);
        events
    }

    /// Advance until no cue is pending.
    pub fn run_until_idle(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.clock.next_deadline() {
            let elapsed = deadline.saturating_sub(self.clock.now());
            events.extend(self.advance(elapsed));
        }
        events
    }

    /// Forward a player selection to the engine.
    ///
    /// A win schedules the next round. A loss records the score and
    /// refreshes the history. If storage fails the game stays lost and the
    /// error carries the score: [`SessionError::ScoreNotSaved`] when the
    /// write failed, [`SessionError::HistoryStale`] when only the re-read
    /// did.
    pub async fn press(&mut self, signal: Signal) -> Result<SubmitOutcome, SessionError> {
        let outcome = self.engine.submit(signal)?;

        match &outcome {
            SubmitOutcome::Accepted { .. } => {}
            SubmitOutcome::RoundWon { next, .. } => {
                let token = self.clock.schedule(next.delay, next.cue.clone());
                self.pending.push(token);
            }
            SubmitOutcome::RoundLost(score) => {
                self.save_score(*score).await?;
            }
        }

        Ok(outcome)
    }

    /// Record a score and refresh the history.
    ///
    /// Used by [`press`](Self::press) after a loss, and by callers retrying
    /// after [`SessionError::ScoreNotSaved`] (which may store the score
    /// twice). After [`SessionError::HistoryStale`] call
    /// [`refresh_history`](Self::refresh_history) instead.
    pub async fn save_score(&mut self, score: Score) -> Result<RecordId, SessionError> {
        let record = self
            .recorder
            .record(score)
            .await
            .map_err(|source| SessionError::ScoreNotSaved { score, source })?;

        if let Err(source) = self.recorder.fetch_history().await {
            return Err(SessionError::HistoryStale {
                score,
                record,
                source,
            });
        }
        Ok(record)
    }

    /// Re-read the score history from storage.
    pub async fn refresh_history(&mut self) -> Result<ScoreHistory, SessionError> {
        Ok(self.recorder.fetch_history().await?)
    }

    pub fn engine(&self) -> &SequenceEngine<R> {
        &self.engine
    }

    pub fn state(&self) -> RoundState {
        self.engine.state()
    }

    pub fn recorder(&self) -> &ScoreRecorder<St> {
        &self.recorder
    }

    pub fn history(&self) -> &ScoreHistory {
        self.recorder.history()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Virtual time elapsed on the session's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    fn schedule_playback(&mut self, schedule: PlaybackSchedule) -> GameEvent {
        let event = GameEvent::RoundStarted {
            round: self.engine.round(),
            token: schedule.token(),
        };
        info!(round = self.engine.round(), cues = schedule.entries().len(), "Scheduling playback");

        for entry in schedule {
            let token = self.clock.schedule(entry.delay, entry.cue);
            self.pending.push(token);
        }
        event
    }

    fn cancel_pending(&mut self) {
        let cancelled = self
            .pending
            .drain(..)
            .filter(|token| self.clock.cancel(*token))
            .count();
        if cancelled > 0 {
            warn!(cancelled, "Cancelled cues from a superseded round");
        }
    }
}
