//! Playback schedules and the cues they are made of.
//!
//! The engine never sleeps. Starting a round yields a [`PlaybackSchedule`]:
//! a list of cues with the delay, relative to the start call, at which the
//! caller's clock should hand each cue back to the engine.

use crate::engine::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier of one round. Every round started gets a fresh, larger token.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct RoundToken(u64);

impl RoundToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RoundToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A timed instruction, tagged with the round that issued it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Cue {
    /// Display the signal at `index` of the sequence
    Show {
        token: RoundToken,
        index: usize,
        signal: Signal,
    },
    /// Playback is over; the player may answer
    Ready { token: RoundToken },
    /// Start the next round after a win
    NextRound { token: RoundToken },
}

impl Cue {
    pub fn token(&self) -> RoundToken {
        match self {
            Self::Show { token, .. } | Self::Ready { token } | Self::NextRound { token } => *token,
        }
    }
}

/// A cue and the delay after which it should fire.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScheduledCue {
    pub delay: Duration,
    pub cue: Cue,
}

/// Ordered cues for revealing one round's sequence.
///
/// For a sequence of length `L` and unit interval `u`, entry `i` shows
/// signal `i` at `(i + 1) * u`, and a trailing `Ready` cue sits at `L * u`,
/// ordered after the last show.
///
/// # Example
///
/// ```rust
/// use recall::engine::{EngineConfig, ScriptedSource, SequenceEngine};
/// use std::time::Duration;
///
/// let config = EngineConfig::builder().unit_interval_ms(500).build().unwrap();
/// let mut engine = SequenceEngine::with_source(config, ScriptedSource::new([0]));
///
/// let schedule = engine.start().unwrap();
/// assert_eq!(schedule.show_count(), 1);
/// assert_eq!(schedule.ready_delay(), Duration::from_millis(500));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PlaybackSchedule {
    token: RoundToken,
    entries: Vec<ScheduledCue>,
}

impl PlaybackSchedule {
    pub(crate) fn build(token: RoundToken, sequence: &[Signal], unit: Duration) -> Self {
        let mut entries: Vec<ScheduledCue> = sequence
            .iter()
            .enumerate()
            .map(|(index, signal)| ScheduledCue {
                delay: steps(unit, index + 1),
                cue: Cue::Show {
                    token,
                    index,
                    signal: signal.clone(),
                },
            })
            .collect();

        entries.push(ScheduledCue {
            delay: steps(unit, sequence.len()),
            cue: Cue::Ready { token },
        });

        Self { token, entries }
    }

    pub fn token(&self) -> RoundToken {
        self.token
    }

    /// All entries, shows first in index order, then the ready cue.
    pub fn entries(&self) -> &[ScheduledCue] {
        &self.entries
    }

    /// Number of display entries (the sequence length).
    pub fn show_count(&self) -> usize {
        self.entries.len() - 1
    }

    /// Display entries as `(delay, index, signal)`.
    pub fn shows(&self) -> impl Iterator<Item = (Duration, usize, &Signal)> + '_ {
        self.entries.iter().filter_map(|entry| match &entry.cue {
            Cue::Show { index, signal, .. } => Some((entry.delay, *index, signal)),
            _ => None,
        })
    }

    /// Delay at which input opens.
    pub fn ready_delay(&self) -> Duration {
        self.entries
            .last()
            .map(|entry| entry.delay)
            .unwrap_or_default()
    }
}

impl IntoIterator for PlaybackSchedule {
    type Item = ScheduledCue;
    type IntoIter = std::vec::IntoIter<ScheduledCue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// `unit * n`, saturating instead of overflowing on absurd rounds.
pub(crate) fn steps(unit: Duration, n: usize) -> Duration {
    unit.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(names: &[&str]) -> Vec<Signal> {
        names.iter().copied().map(Signal::from).collect()
    }

    #[test]
    fn schedule_has_one_show_per_signal_then_ready() {
        let sequence = signals(&["red", "blue", "green"]);
        let schedule =
            PlaybackSchedule::build(RoundToken::new(3), &sequence, Duration::from_millis(1000));

        assert_eq!(schedule.show_count(), 3);
        assert_eq!(schedule.entries().len(), 4);

        let delays: Vec<u64> = schedule
            .shows()
            .map(|(delay, _, _)| delay.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1000, 2000, 3000]);

        let shown: Vec<&Signal> = schedule.shows().map(|(_, _, s)| s).collect();
        assert_eq!(shown, sequence.iter().collect::<Vec<_>>());

        assert_eq!(schedule.ready_delay(), Duration::from_millis(3000));
        assert!(matches!(
            schedule.entries().last().map(|e| &e.cue),
            Some(Cue::Ready { token }) if *token == RoundToken::new(3)
        ));
    }

    #[test]
    fn every_cue_carries_the_round_token() {
        let schedule = PlaybackSchedule::build(
            RoundToken::new(9),
            &signals(&["a", "b"]),
            Duration::from_millis(10),
        );
        assert!(schedule
            .entries()
            .iter()
            .all(|e| e.cue.token() == RoundToken::new(9)));
    }

    #[test]
    fn steps_saturates() {
        let unit = Duration::from_secs(u64::MAX / 2);
        assert_eq!(steps(unit, 4), Duration::MAX);
        assert_eq!(steps(Duration::from_millis(5), 3), Duration::from_millis(15));
    }

    #[test]
    fn tokens_increase() {
        let token = RoundToken::default();
        assert!(token.next() > token);
        assert_eq!(token.next().value(), 1);
        assert_eq!(RoundToken::new(4).to_string(), "#4");
    }
}
