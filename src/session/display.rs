//! Rendering sink for playback.

use crate::engine::Signal;

/// Receives playback as it happens. Nothing it does feeds back into the
/// game.
pub trait SignalDisplay {
    /// Show the signal at `step` (0-indexed) of the sequence.
    fn show(&mut self, signal: &Signal, step: usize);

    /// Playback is over; the player may answer.
    fn ready(&mut self);
}

impl<D: SignalDisplay + ?Sized> SignalDisplay for &mut D {
    fn show(&mut self, signal: &Signal, step: usize) {
        (**self).show(signal, step);
    }

    fn ready(&mut self) {
        (**self).ready();
    }
}

/// What a [`DisplayLog`] saw.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DisplayEntry {
    Show { step: usize, signal: Signal },
    Ready,
}

/// Display that records every call, for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct DisplayLog {
    entries: Vec<DisplayEntry>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    /// Signals shown so far, in order.
    pub fn shown(&self) -> Vec<&Signal> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                DisplayEntry::Show { signal, .. } => Some(signal),
                DisplayEntry::Ready => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl SignalDisplay for DisplayLog {
    fn show(&mut self, signal: &Signal, step: usize) {
        self.entries.push(DisplayEntry::Show {
            step,
            signal: signal.clone(),
        });
    }

    fn ready(&mut self) {
        self.entries.push(DisplayEntry::Ready);
    }
}
