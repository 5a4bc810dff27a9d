//! The sequence engine: round progression, input validation and playback
//! schedules.

use crate::checkpoint::{EngineSnapshot, SnapshotError};
use crate::core::{Guard, RoundState, StateHistory, StateTransition};
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::rng::{GameRng, SignalSource};
use crate::engine::schedule::{steps, Cue, PlaybackSchedule, RoundToken, ScheduledCue};
use crate::engine::score::Score;
use crate::engine::signal::Signal;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Result of a successful `submit`.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Correct so far; `remaining` more signals are expected
    Accepted { remaining: usize },

    /// The whole sequence was reproduced. `next` must be handed back to
    /// [`SequenceEngine::on_cue`] after its delay to start the next round.
    RoundWon { round: usize, next: ScheduledCue },

    /// Wrong signal; the game is over
    RoundLost(Score),
}

/// What a fired cue means for the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum CueOutcome {
    /// Display this signal
    Show { index: usize, signal: Signal },

    /// Playback finished; input is open
    InputOpened,

    /// A new round started; its cues need scheduling
    NextRound(PlaybackSchedule),

    /// The cue belongs to a superseded round or phase and was ignored
    Stale,
}

/// Owns the game state and drives it through rounds.
///
/// The engine never blocks and owns no clock. [`start`](Self::start)
/// returns a [`PlaybackSchedule`]; the caller fires its cues back through
/// [`on_cue`](Self::on_cue) at the scheduled delays. Cues from earlier
/// rounds are recognised by their [`RoundToken`] and ignored.
///
/// # Example
///
/// ```rust
/// use recall::core::RoundState;
/// use recall::engine::{CueOutcome, EngineConfig, ScriptedSource, SequenceEngine, Signal, SubmitOutcome};
///
/// let mut engine = SequenceEngine::with_source(EngineConfig::default(), ScriptedSource::new([0, 2]));
///
/// let schedule = engine.start().unwrap();
/// for entry in schedule {
///     engine.on_cue(&entry.cue);
/// }
/// assert_eq!(engine.state(), RoundState::AwaitingInput);
///
/// let outcome = engine.submit(Signal::new("red")).unwrap();
/// let SubmitOutcome::RoundWon { next, .. } = outcome else { panic!("expected a win") };
///
/// let CueOutcome::NextRound(schedule) = engine.on_cue(&next.cue) else { panic!("expected next round") };
/// assert_eq!(schedule.show_count(), 2);
/// assert_eq!(engine.sequence(), &[Signal::new("red"), Signal::new("green")]);
/// ```
#[derive(Debug)]
pub struct SequenceEngine<R: SignalSource = GameRng> {
    config: EngineConfig,
    source: R,
    sequence: Vec<Signal>,
    input: Vec<Signal>,
    state: RoundState,
    token: RoundToken,
    history: StateHistory<RoundState>,
    start_guard: Guard<RoundState>,
    submit_guard: Guard<RoundState>,
}

impl SequenceEngine<GameRng> {
    /// Create an engine using the default random source, seeded from the
    /// configuration when a seed is present.
    pub fn new(config: EngineConfig) -> Self {
        let source = config
            .seed()
            .map(GameRng::new)
            .unwrap_or_else(GameRng::from_entropy);
        Self::with_source(config, source)
    }
}

impl<R: SignalSource> SequenceEngine<R> {
    pub fn with_source(config: EngineConfig, source: R) -> Self {
        Self {
            config,
            source,
            sequence: Vec::new(),
            input: Vec::new(),
            state: RoundState::Idle,
            token: RoundToken::default(),
            history: StateHistory::new(),
            start_guard: Guard::new("start", RoundState::accepts_start),
            submit_guard: Guard::new("submit", RoundState::accepts_input),
        }
    }

    /// Start a round.
    ///
    /// After a win the sequence grows by one signal; from `Idle` or after a
    /// loss a new game begins with a single signal and a fresh transition
    /// history. Player input is cleared and the round token advances,
    /// invalidating every earlier cue.
    pub fn start(&mut self) -> Result<PlaybackSchedule, EngineError> {
        self.ensure(&self.start_guard)?;

        if self.state != RoundState::RoundWon {
            self.sequence.clear();
            self.history.clear();
        }

        let signal = self.config.alphabet().pick(&mut self.source);
        self.sequence.push(signal);
        self.input.clear();
        self.token = self.token.next();
        self.transition(RoundState::Revealing);

        info!(
            round = self.round(),
            token = %self.token,
            "Round started"
        );

        Ok(self.playback())
    }

    /// Open input for the round identified by `token`.
    ///
    /// Normally reached through the schedule's `Ready` cue.
    pub fn begin_input(&mut self, token: RoundToken) -> Result<(), EngineError> {
        if token != self.token {
            return Err(EngineError::StaleRound {
                current: self.token,
                found: token,
            });
        }
        if self.state != RoundState::Revealing {
            return Err(EngineError::InvalidState {
                operation: "begin_input",
                state: self.state,
            });
        }

        self.transition(RoundState::AwaitingInput);
        Ok(())
    }

    /// Apply a cue whose delay has elapsed.
    pub fn on_cue(&mut self, cue: &Cue) -> CueOutcome {
        if cue.token() != self.token {
            debug!(cue_token = %cue.token(), token = %self.token, "Ignoring stale cue");
            return CueOutcome::Stale;
        }

        let outcome = match cue {
            Cue::Show { index, signal, .. } if self.state == RoundState::Revealing => {
                CueOutcome::Show {
                    index: *index,
                    signal: signal.clone(),
                }
            }
            Cue::Ready { token } => match self.begin_input(*token) {
                Ok(()) => CueOutcome::InputOpened,
                Err(_) => CueOutcome::Stale,
            },
            Cue::NextRound { .. } if self.state == RoundState::RoundWon => match self.start() {
                Ok(schedule) => CueOutcome::NextRound(schedule),
                Err(_) => CueOutcome::Stale,
            },
            _ => CueOutcome::Stale,
        };

        if outcome == CueOutcome::Stale {
            debug!(state = %self.state, ?cue, "Cue does not apply to the current phase");
        }
        outcome
    }

    /// Submit the player's next signal.
    pub fn submit(&mut self, signal: Signal) -> Result<SubmitOutcome, EngineError> {
        self.ensure(&self.submit_guard)?;

        let index = self.input.len();
        assert!(
            index < self.sequence.len(),
            "input already covers the whole sequence while awaiting input"
        );
        let matched = self.sequence[index] == signal;
        self.input.push(signal);

        if !matched {
            let score = Score::completed_rounds(self.sequence.len());
            self.transition(RoundState::RoundLost);
            info!(
                round = self.round(),
                position = index,
                score = score.value(),
                "Round lost"
            );
            return Ok(SubmitOutcome::RoundLost(score));
        }

        if self.input.len() == self.sequence.len() {
            self.transition(RoundState::RoundWon);
            info!(round = self.round(), "Round won");
            return Ok(SubmitOutcome::RoundWon {
                round: self.round(),
                next: self.next_round_cue(),
            });
        }

        Ok(SubmitOutcome::Accepted {
            remaining: self.sequence.len() - self.input.len(),
        })
    }

    /// Schedule for replaying the current sequence, tagged with the current
    /// round token.
    pub fn playback(&self) -> PlaybackSchedule {
        PlaybackSchedule::build(self.token, &self.sequence, self.config.unit_interval())
    }

    /// Delay after a win before the next round starts.
    pub fn next_round_delay(&self) -> std::time::Duration {
        steps(self.config.unit_interval(), 1)
    }

    /// The cue a won round is waiting for, or `None` in any other state.
    ///
    /// `submit` hands this out once; an engine restored in `RoundWon` needs
    /// it scheduled again.
    pub fn pending_next_round(&self) -> Option<ScheduledCue> {
        (self.state == RoundState::RoundWon).then(|| self.next_round_cue())
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn sequence(&self) -> &[Signal] {
        &self.sequence
    }

    pub fn input(&self) -> &[Signal] {
        &self.input
    }

    /// Current round number, 1-indexed; zero before the first start.
    pub fn round(&self) -> usize {
        self.sequence.len()
    }

    pub fn token(&self) -> RoundToken {
        self.token
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &StateHistory<RoundState> {
        &self.history
    }

    /// Capture the engine's game state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(
            self.state,
            self.sequence.clone(),
            self.input.clone(),
            self.token,
            self.history.clone(),
        )
    }

    /// Resume a game from a snapshot.
    ///
    /// The snapshot is checked against the configuration's alphabet and for
    /// internal consistency before anything is restored.
    pub fn restore(
        config: EngineConfig,
        source: R,
        snapshot: EngineSnapshot,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate(config.alphabet())?;

        let mut engine = Self::with_source(config, source);
        engine.state = snapshot.state;
        engine.sequence = snapshot.sequence;
        engine.input = snapshot.input;
        engine.token = snapshot.token;
        engine.history = snapshot.history;

        info!(
            state = %engine.state,
            round = engine.round(),
            snapshot = %snapshot.id,
            "Engine restored from snapshot"
        );
        Ok(engine)
    }

    fn next_round_cue(&self) -> ScheduledCue {
        ScheduledCue {
            delay: self.next_round_delay(),
            cue: Cue::NextRound { token: self.token },
        }
    }

    fn ensure(&self, guard: &Guard<RoundState>) -> Result<(), EngineError> {
        if guard.check(&self.state) {
            return Ok(());
        }
        warn!(
            operation = guard.operation(),
            state = %self.state,
            "Operation rejected"
        );
        Err(EngineError::InvalidState {
            operation: guard.operation(),
            state: self.state,
        })
    }

    fn transition(&mut self, to: RoundState) {
        debug!(from = %self.state, to = %to, token = %self.token, "State transition");
        self.history.push(StateTransition {
            from: self.state,
            to,
            timestamp: Utc::now(),
            round: self.token.value(),
        });
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedSource;
    use std::time::Duration;

    fn engine_with(picks: &[usize]) -> SequenceEngine<ScriptedSource> {
        SequenceEngine::with_source(
            EngineConfig::default(),
            ScriptedSource::new(picks.iter().copied()),
        )
    }

    fn reveal(engine: &mut SequenceEngine<ScriptedSource>, schedule: PlaybackSchedule) {
        for entry in schedule {
            engine.on_cue(&entry.cue);
        }
    }

    fn color(name: &str) -> Signal {
        Signal::new(name)
    }

    /// Play rounds until the sequence has `len` signals, answering correctly.
    fn play_to(engine: &mut SequenceEngine<ScriptedSource>, len: usize) {
        let schedule = engine.start().unwrap();
        reveal(engine, schedule);
        while engine.round() < len {
            for signal in engine.sequence().to_vec() {
                engine.submit(signal).unwrap();
            }
            let schedule = engine.start().unwrap();
            reveal(engine, schedule);
        }
    }

    #[test]
    fn new_engine_is_idle_and_empty() {
        let engine = engine_with(&[0]);
        assert_eq!(engine.state(), RoundState::Idle);
        assert!(engine.sequence().is_empty());
        assert!(engine.input().is_empty());
        assert_eq!(engine.round(), 0);
    }

    #[test]
    fn start_appends_one_signal_and_reveals() {
        let mut engine = engine_with(&[1]);
        let schedule = engine.start().unwrap();

        assert_eq!(engine.state(), RoundState::Revealing);
        assert_eq!(engine.sequence(), &[color("blue")]);
        assert_eq!(schedule.token(), engine.token());
        assert_eq!(schedule.show_count(), 1);
    }

    #[test]
    fn start_is_rejected_while_round_in_flight() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();

        let err = engine.start().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidState {
                operation: "start",
                state: RoundState::Revealing
            }
        );

        reveal(&mut engine, schedule);
        assert!(engine.start().is_err());
        assert_eq!(engine.sequence().len(), 1);
        assert_eq!(engine.state(), RoundState::AwaitingInput);
    }

    #[test]
    fn submit_outside_awaiting_input_is_a_no_op() {
        let mut engine = engine_with(&[0]);

        assert!(engine.submit(color("red")).is_err());
        assert_eq!(engine.state(), RoundState::Idle);

        engine.start().unwrap();
        let err = engine.submit(color("red")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { operation: "submit", .. }));
        assert_eq!(engine.state(), RoundState::Revealing);
        assert!(engine.input().is_empty());
    }

    #[test]
    fn ready_cue_opens_input() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();
        let ready = schedule.entries().last().unwrap().cue.clone();

        assert_eq!(engine.on_cue(&ready), CueOutcome::InputOpened);
        assert_eq!(engine.state(), RoundState::AwaitingInput);
        assert_eq!(engine.on_cue(&ready), CueOutcome::Stale);
    }

    #[test]
    fn show_cues_return_signals_in_order() {
        let mut engine = engine_with(&[0, 1, 2]);
        play_to(&mut engine, 2);
        for signal in engine.sequence().to_vec() {
            engine.submit(signal).unwrap();
        }
        let schedule = engine.start().unwrap();

        let shown: Vec<(usize, Signal)> = schedule
            .entries()
            .iter()
            .filter_map(|entry| match engine.on_cue(&entry.cue) {
                CueOutcome::Show { index, signal } => Some((index, signal)),
                _ => None,
            })
            .collect();

        assert_eq!(
            shown,
            vec![(0, color("red")), (1, color("blue")), (2, color("green"))]
        );
    }

    #[test]
    fn mismatch_scores_completed_rounds() {
        // sequence [red, blue, green], player answers [red, yellow]
        let mut engine = engine_with(&[0, 1, 2]);
        play_to(&mut engine, 3);
        assert_eq!(engine.sequence(), &[color("red"), color("blue"), color("green")]);

        assert_eq!(
            engine.submit(color("red")).unwrap(),
            SubmitOutcome::Accepted { remaining: 2 }
        );
        let outcome = engine.submit(color("yellow")).unwrap();

        match outcome {
            SubmitOutcome::RoundLost(score) => assert_eq!(score.value(), 2),
            other => panic!("Expected RoundLost, got {other:?}"),
        }
        assert_eq!(engine.state(), RoundState::RoundLost);
        assert_eq!(engine.sequence().len(), 3);
        assert_eq!(engine.input(), &[color("red"), color("yellow")]);
    }

    #[test]
    fn mismatch_on_first_round_scores_zero() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);

        match engine.submit(color("blue")).unwrap() {
            SubmitOutcome::RoundLost(score) => assert_eq!(score.value(), 0),
            other => panic!("Expected RoundLost, got {other:?}"),
        }
    }

    #[test]
    fn signal_outside_alphabet_is_a_mismatch() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);

        let outcome = engine.submit(color("purple")).unwrap();
        assert!(matches!(outcome, SubmitOutcome::RoundLost(_)));
    }

    #[test]
    fn completing_the_sequence_wins_and_schedules_next_round() {
        let mut engine = engine_with(&[3]);
        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);

        let outcome = engine.submit(color("yellow")).unwrap();
        let SubmitOutcome::RoundWon { round, next } = outcome else {
            panic!("Expected RoundWon");
        };
        assert_eq!(round, 1);
        assert_eq!(next.delay, Duration::from_millis(1000));
        assert_eq!(next.delay, engine.next_round_delay());
        assert_eq!(engine.state(), RoundState::RoundWon);

        let CueOutcome::NextRound(schedule) = engine.on_cue(&next.cue) else {
            panic!("Expected NextRound");
        };
        assert_eq!(engine.sequence().len(), 2);
        assert_eq!(schedule.show_count(), 2);
        assert!(engine.input().is_empty());
    }

    #[test]
    fn sequence_length_equals_rounds_won() {
        let mut engine = engine_with(&[0, 3, 1, 1, 2]);
        play_to(&mut engine, 6);
        assert_eq!(engine.sequence().len(), 6);
        assert_eq!(engine.round(), 6);
    }

    #[test]
    fn restart_after_loss_begins_a_new_game() {
        let mut engine = engine_with(&[0, 1]);
        play_to(&mut engine, 2);
        engine.submit(color("green")).unwrap();
        assert_eq!(engine.state(), RoundState::RoundLost);

        engine.start().unwrap();
        assert_eq!(engine.sequence().len(), 1);
        assert!(engine.input().is_empty());
    }

    #[test]
    fn cues_from_previous_round_are_stale() {
        let mut engine = engine_with(&[0, 1]);
        let first = engine.start().unwrap();
        let first_cues: Vec<Cue> = first.entries().iter().map(|e| e.cue.clone()).collect();
        reveal(&mut engine, first);

        engine.submit(color("green")).unwrap();
        engine.start().unwrap();

        for cue in &first_cues {
            assert_eq!(engine.on_cue(cue), CueOutcome::Stale);
        }
        assert_eq!(engine.state(), RoundState::Revealing);
    }

    #[test]
    fn next_round_cue_is_stale_after_manual_start() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);
        let SubmitOutcome::RoundWon { next, .. } = engine.submit(color("red")).unwrap() else {
            panic!("Expected RoundWon");
        };

        engine.start().unwrap();
        assert_eq!(engine.on_cue(&next.cue), CueOutcome::Stale);
        assert_eq!(engine.sequence().len(), 2);
    }

    #[test]
    fn pending_next_round_only_after_a_win() {
        let mut engine = engine_with(&[0]);
        assert!(engine.pending_next_round().is_none());

        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);
        assert!(engine.pending_next_round().is_none());

        let SubmitOutcome::RoundWon { next, .. } = engine.submit(color("red")).unwrap() else {
            panic!("Expected RoundWon");
        };
        assert_eq!(engine.pending_next_round(), Some(next));
    }

    #[test]
    fn begin_input_rejects_stale_tokens() {
        let mut engine = engine_with(&[0]);
        engine.start().unwrap();

        let err = engine.begin_input(RoundToken::new(0)).unwrap_err();
        assert!(matches!(err, EngineError::StaleRound { .. }));
        assert_eq!(engine.state(), RoundState::Revealing);

        engine.begin_input(engine.token()).unwrap();
        assert_eq!(engine.state(), RoundState::AwaitingInput);
    }

    #[test]
    fn history_tracks_round_lifecycle() {
        let mut engine = engine_with(&[0]);
        let schedule = engine.start().unwrap();
        reveal(&mut engine, schedule);
        engine.submit(color("blue")).unwrap();

        let path = engine.history().get_path();
        assert_eq!(
            path,
            vec![
                &RoundState::Idle,
                &RoundState::Revealing,
                &RoundState::AwaitingInput,
                &RoundState::RoundLost,
            ]
        );
        assert!(engine.history().transitions().iter().all(|t| t.round == 1));
    }

    #[test]
    fn history_covers_only_the_current_game() {
        let mut engine = engine_with(&[0]);
        for _ in 0..200 {
            let schedule = engine.start().unwrap();
            reveal(&mut engine, schedule);
            engine.submit(color("blue")).unwrap();
        }

        let path = engine.history().get_path();
        assert_eq!(
            path,
            vec![
                &RoundState::RoundLost,
                &RoundState::Revealing,
                &RoundState::AwaitingInput,
                &RoundState::RoundLost,
            ]
        );
        assert_eq!(engine.history().times_entered(&RoundState::Revealing), 1);
    }

    #[test]
    fn history_spans_every_round_of_a_game() {
        let mut engine = engine_with(&[0, 1, 2]);
        play_to(&mut engine, 3);

        assert_eq!(engine.history().times_entered(&RoundState::Revealing), 3);
        assert_eq!(engine.history().times_entered(&RoundState::RoundWon), 2);
    }

    #[test]
    fn seeded_engines_generate_identical_sequences() {
        let config = EngineConfig::builder().seed(31).build().unwrap();
        let mut a = SequenceEngine::new(config.clone());
        let mut b = SequenceEngine::new(config);

        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.sequence(), b.sequence());
    }
}
