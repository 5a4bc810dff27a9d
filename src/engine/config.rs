//! Engine configuration, validated with accumulated errors.
//!
//! Configuration comes either from [`EngineConfigBuilder`] or from a JSON
//! document. Every problem is collected before the build fails, so a bad
//! file is reported in one pass.

use crate::engine::signal::{check_signals, Alphabet, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Default delay between consecutive cues of a playback.
pub const DEFAULT_UNIT_INTERVAL_MS: u64 = 1000;

/// Upper bound for the unit interval; a longer reveal is almost certainly a
/// milliseconds/seconds mix-up.
pub const MAX_UNIT_INTERVAL_MS: u64 = 60_000;

/// A single configuration problem.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("alphabet must contain at least one signal")]
    EmptyAlphabet,

    #[error("alphabet contains a blank signal name")]
    BlankSignal,

    #[error("signal '{0}' appears more than once in the alphabet")]
    DuplicateSignal(String),

    #[error("unit interval must be greater than zero")]
    ZeroInterval,

    #[error("unit interval {found}ms exceeds the maximum of {max}ms")]
    IntervalTooLong { found: u64, max: u64 },

    #[error("configuration could not be parsed: {0}")]
    Parse(String),
}

/// Every problem found while validating a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid engine configuration: {}", join_errors(.0))]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> + '_ {
        self.0.iter()
    }
}

impl From<NonEmptyVec<ConfigError>> for ConfigErrors {
    fn from(errors: NonEmptyVec<ConfigError>) -> Self {
        Self(errors.iter().cloned().collect())
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validated engine configuration.
///
/// # Example
///
/// ```rust
/// use recall::engine::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::from_json(r#"{ "unit_interval_ms": 250, "seed": 7 }"#).unwrap();
/// assert_eq!(config.unit_interval(), Duration::from_millis(250));
/// assert_eq!(config.alphabet().len(), 4);
/// assert_eq!(config.seed(), Some(7));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile", into = "ConfigFile")]
pub struct EngineConfig {
    alphabet: Alphabet,
    unit_interval: Duration,
    seed: Option<u64>,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigErrors> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(file)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn unit_interval(&self) -> Duration {
        self.unit_interval
    }

    /// Seed for the default random source; `None` means seeded from entropy.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::classic(),
            unit_interval: Duration::from_millis(DEFAULT_UNIT_INTERVAL_MS),
            seed: None,
        }
    }
}

/// On-disk shape of the configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    alphabet: Option<Vec<Signal>>,
    unit_interval_ms: Option<u64>,
    seed: Option<u64>,
}

impl TryFrom<ConfigFile> for EngineConfig {
    type Error = ConfigErrors;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let mut builder = EngineConfigBuilder::new();
        if let Some(signals) = file.alphabet {
            builder = builder.signals(signals);
        }
        if let Some(ms) = file.unit_interval_ms {
            builder = builder.unit_interval_ms(ms);
        }
        if let Some(seed) = file.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

impl From<EngineConfig> for ConfigFile {
    fn from(config: EngineConfig) -> Self {
        Self {
            alphabet: Some(config.alphabet.into()),
            unit_interval_ms: Some(config.unit_interval.as_millis() as u64),
            seed: config.seed,
        }
    }
}

/// Builder for [`EngineConfig`].
///
/// ```rust
/// use recall::engine::{ConfigError, EngineConfig};
///
/// let errors = EngineConfig::builder()
///     .signals(Vec::<&str>::new())
///     .unit_interval_ms(0)
///     .build()
///     .unwrap_err();
///
/// assert_eq!(errors.len(), 2);
/// assert!(errors.iter().any(|e| matches!(e, ConfigError::ZeroInterval)));
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfigBuilder {
    signals: Vec<Signal>,
    unit_interval_ms: u64,
    seed: Option<u64>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            signals: Alphabet::classic().into(),
            unit_interval_ms: DEFAULT_UNIT_INTERVAL_MS,
            seed: None,
        }
    }

    /// Replace the alphabet with these signals.
    pub fn signals<I, T>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Signal>,
    {
        self.signals = signals.into_iter().map(Into::into).collect();
        self
    }

    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.signals = alphabet.into();
        self
    }

    pub fn unit_interval_ms(mut self, ms: u64) -> Self {
        self.unit_interval_ms = ms;
        self
    }

    pub fn unit_interval(self, interval: Duration) -> Self {
        let ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.unit_interval_ms(ms)
    }

    /// Seed the default random source for reproducible games.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every rule, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let interval = if self.unit_interval_ms == 0 {
            Validation::fail(ConfigError::ZeroInterval)
        } else if self.unit_interval_ms > MAX_UNIT_INTERVAL_MS {
            Validation::fail(ConfigError::IntervalTooLong {
                found: self.unit_interval_ms,
                max: MAX_UNIT_INTERVAL_MS,
            })
        } else {
            Validation::success(())
        };

        Validation::all_vec(vec![check_signals(&self.signals), interval]).map(|_| ())
    }

    pub fn build(self) -> Result<EngineConfig, ConfigErrors> {
        match self.validate() {
            Validation::Success(_) => Ok(EngineConfig {
                alphabet: Alphabet::new(self.signals)?,
                unit_interval: Duration::from_millis(self.unit_interval_ms),
                seed: self.seed,
            }),
            Validation::Failure(errors) => Err(errors.into()),
        }
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} signals, {}ms unit interval",
            self.alphabet.len(),
            self.unit_interval.as_millis()
        )
    }
}
