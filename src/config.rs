// src/config.rs

//! Run parameters shared by both tracks.

use crate::classical::validate_factor;
use crate::core::constants::dense_constants::{DEFAULT_REPETITION_FACTOR, DEFAULT_SEED, DEFAULT_SHOTS};
use crate::core::DenseError;
use serde::{Deserialize, Serialize};

/// Parameters of one protocol run.
///
/// Missing fields take their defaults when deserializing, so `{}` is a valid
/// configuration. Deserialized values are checked with [`validate`](Self::validate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct ProtocolConfig {
    /// Copies per message bit on the classical track. Must be odd.
    pub repetition_factor: usize,
    /// Per-bit flip probability of the classical channel, in `[0, 1]`.
    pub flip_probability: f64,
    /// Measurement shots taken at the quantum `Measured` stage.
    pub shots: u64,
    /// Seed of every random source used during the run.
    pub seed: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            repetition_factor: DEFAULT_REPETITION_FACTOR,
            flip_probability: 0.0,
            shots: DEFAULT_SHOTS,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawConfig {
    repetition_factor: usize,
    flip_probability: f64,
    shots: u64,
    seed: u64,
}

impl Default for RawConfig {
    fn default() -> Self {
        let ProtocolConfig { repetition_factor, flip_probability, shots, seed } = ProtocolConfig::default();
        Self { repetition_factor, flip_probability, shots, seed }
    }
}

impl TryFrom<RawConfig> for ProtocolConfig {
    type Error = DenseError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let config = ProtocolConfig {
            repetition_factor: raw.repetition_factor,
            flip_probability: raw.flip_probability,
            shots: raw.shots,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ProtocolConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// `DenseError::Serialization` for malformed JSON, `DenseError::InvalidArgument`
    /// for well-formed JSON with invalid values.
    pub fn from_json(json: &str) -> Result<Self, DenseError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        ProtocolConfig::try_from(raw)
    }

    /// Sets the repetition factor.
    pub fn with_repetition_factor(mut self, repetition_factor: usize) -> Self {
        self.repetition_factor = repetition_factor;
        self
    }

    /// Sets the channel flip probability.
    pub fn with_flip_probability(mut self, flip_probability: f64) -> Self {
        self.flip_probability = flip_probability;
        self
    }

    /// Sets the number of measurement shots.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every field.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` for a repetition factor the codec rejects
    /// (zero, even, or above `MAX_REPETITION_FACTOR`), a flip probability
    /// outside `[0, 1]`, or zero shots.
    pub fn validate(&self) -> Result<(), DenseError> {
        validate_factor(self.repetition_factor)?;
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err(DenseError::invalid_argument(format!(
                "flip probability {} is outside [0, 1]",
                self.flip_probability
            )));
        }
        if self.shots == 0 {
            return Err(DenseError::invalid_argument("shots must be greater than zero"));
        }
        Ok(())
    }
}
