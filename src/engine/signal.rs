//! Signals and the alphabet they are drawn from.

use crate::engine::config::ConfigError;
use crate::engine::rng::SignalSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// One discrete value of the game alphabet, usually a color.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(String);

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signal {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Ordered, non-empty, duplicate-free set of signals.
///
/// # Example
///
/// ```rust
/// use recall::engine::{Alphabet, Signal};
///
/// let classic = Alphabet::classic();
/// assert_eq!(classic.len(), 4);
/// assert!(classic.contains(&Signal::new("green")));
///
/// assert!(Alphabet::new(Vec::<Signal>::new()).is_err());
/// assert!(Alphabet::new(["a", "a"].map(Signal::from)).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Signal>", into = "Vec<Signal>")]
pub struct Alphabet {
    signals: Vec<Signal>,
}

impl Alphabet {
    /// Names of the classic four-color board.
    pub const CLASSIC: [&'static str; 4] = ["red", "blue", "green", "yellow"];

    /// Build an alphabet, reporting every problem with the given signals.
    pub fn new<I>(signals: I) -> Result<Self, crate::engine::ConfigErrors>
    where
        I: IntoIterator<Item = Signal>,
    {
        let signals: Vec<Signal> = signals.into_iter().collect();
        match check_signals(&signals) {
            Validation::Success(_) => Ok(Self { signals }),
            Validation::Failure(errors) => Err(errors.into()),
        }
    }

    /// The red/blue/green/yellow board.
    pub fn classic() -> Self {
        Self {
            signals: Self::CLASSIC.iter().copied().map(Signal::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn contains(&self, signal: &Signal) -> bool {
        self.signals.contains(signal)
    }

    pub fn get(&self, index: usize) -> Option<&Signal> {
        self.signals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> + '_ {
        self.signals.iter()
    }

    /// Draw one signal. Out-of-range picks wrap around the alphabet.
    pub fn pick<R: SignalSource + ?Sized>(&self, source: &mut R) -> Signal {
        let index = source.pick(self.signals.len()) % self.signals.len();
        self.signals[index].clone()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<Vec<Signal>> for Alphabet {
    type Error = crate::engine::ConfigErrors;

    fn try_from(signals: Vec<Signal>) -> Result<Self, Self::Error> {
        Self::new(signals)
    }
}

impl From<Alphabet> for Vec<Signal> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.signals
    }
}

/// Accumulate every alphabet problem instead of stopping at the first.
pub(crate) fn check_signals(signals: &[Signal]) -> Validation<(), NonEmptyVec<ConfigError>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

    if signals.is_empty() {
        checks.push(Validation::fail(ConfigError::EmptyAlphabet));
    }

    let mut seen = HashSet::new();
    for signal in signals {
        if signal.as_str().trim().is_empty() {
            checks.push(Validation::fail(ConfigError::BlankSignal));
        } else if !seen.insert(signal) {
            checks.push(Validation::fail(ConfigError::DuplicateSignal(
                signal.as_str().to_string(),
            )));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
