// src/protocol/mod.rs

//! Step-by-step disclosure of the two protocols.
//!
//! Each track is an explicit state machine over a fixed list of stages. A
//! [`ProtocolStepMachine`] owns one of each for the chosen message; callers
//! drive it with advance and reset commands and render `snapshot()` after
//! every step. Nothing here is global: two machines never interfere.
//!
//! Advancing a track that already sits on its terminal stage is a no-op with
//! [`StepTrack::advance`] and an `AlreadyComplete` error with
//! [`StepTrack::try_advance`].

mod classical;
mod quantum;
mod stage;

pub use classical::{ClassicalSnapshot, ClassicalTrack};
pub use quantum::{QuantumSnapshot, QuantumTrack};
pub use stage::{ClassicalStage, QuantumStage, StageSequence};

use crate::config::ProtocolConfig;
use crate::core::{DenseError, Message};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common interface of the quantum and classical step machines.
pub trait StepTrack {
    /// Stage enumeration of this track.
    type Stage: StageSequence;
    /// Render data produced at each stage.
    type Snapshot;

    /// Track name used in logs and errors.
    const NAME: &'static str;

    /// Current stage.
    fn stage(&self) -> Self::Stage;

    /// Moves to the next stage.
    ///
    /// # Errors
    /// `DenseError::AlreadyComplete` on the terminal stage, or any error from
    /// the work done entering the next stage.
    fn try_advance(&mut self) -> Result<Self::Stage, DenseError>;

    /// Back to the initial stage with a fresh engine or codec state.
    fn reset(&mut self);

    /// Render data for the current stage.
    fn snapshot(&self) -> Result<Self::Snapshot, DenseError>;

    /// Returns `true` once the terminal stage is reached.
    fn is_complete(&self) -> bool {
        self.stage().is_terminal()
    }

    /// Like [`try_advance`](Self::try_advance), but a no-op on the terminal stage.
    fn advance(&mut self) -> Result<Self::Stage, DenseError> {
        if self.is_complete() {
            warn!("{} track already at '{}'; advance ignored", Self::NAME, self.stage());
            return Ok(self.stage());
        }
        self.try_advance()
    }

    /// Resets and replays transitions until `stage` is current.
    fn seek(&mut self, stage: Self::Stage) -> Result<(), DenseError> {
        self.reset();
        while self.stage() != stage {
            self.try_advance()?;
        }
        Ok(())
    }
}

pub(crate) fn already_complete<S: StageSequence>(track: &str, stage: S) -> DenseError {
    DenseError::AlreadyComplete { track: track.to_string(), stage: stage.title().to_string() }
}

/// Selects one of the two tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Superdense coding.
    Quantum,
    /// Repetition code.
    Classical,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Quantum => f.write_str(QuantumTrack::NAME),
            Track::Classical => f.write_str(ClassicalTrack::NAME),
        }
    }
}

/// Render data of either track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "track", rename_all = "snake_case")]
pub enum Snapshot {
    /// Quantum track data.
    Quantum(QuantumSnapshot),
    /// Classical track data.
    Classical(ClassicalSnapshot),
}

/// The caller-owned session: chosen message, run parameters and both tracks.
///
/// A machine restored from JSON is checked like a new one: the config must
/// validate and both tracks must run the machine's message with its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMachine")]
pub struct ProtocolStepMachine {
    message: Message,
    config: ProtocolConfig,
    quantum: QuantumTrack,
    classical: ClassicalTrack,
}

#[derive(Deserialize)]
struct RawMachine {
    message: Message,
    config: ProtocolConfig,
    quantum: QuantumTrack,
    classical: ClassicalTrack,
}

impl TryFrom<RawMachine> for ProtocolStepMachine {
    type Error = DenseError;

    fn try_from(raw: RawMachine) -> Result<Self, Self::Error> {
        raw.config.validate()?;
        if !raw.quantum.runs(raw.message, &raw.config) {
            return Err(DenseError::invalid_argument(format!(
                "quantum track does not match message {} and its config",
                raw.message
            )));
        }
        if !raw.classical.runs(raw.message, &raw.config) {
            return Err(DenseError::invalid_argument(format!(
                "classical track does not match message {} and its config",
                raw.message
            )));
        }
        Ok(Self { message: raw.message, config: raw.config, quantum: raw.quantum, classical: raw.classical })
    }
}

impl ProtocolStepMachine {
    /// Both tracks at `Init` for `message`.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` if `config` does not validate.
    pub fn new(message: Message, config: ProtocolConfig) -> Result<Self, DenseError> {
        config.validate()?;
        Ok(Self {
            message,
            config,
            quantum: QuantumTrack::new(message, &config),
            classical: ClassicalTrack::new(message, &config)?,
        })
    }

    /// Restores a machine saved with `serde_json`, checking it like [`new`](Self::new).
    ///
    /// # Errors
    /// `DenseError::Serialization` for malformed JSON, `DenseError::InvalidArgument`
    /// for an invalid config or tracks that disagree with the machine.
    pub fn from_json(json: &str) -> Result<Self, DenseError> {
        let raw: RawMachine = serde_json::from_str(json)?;
        ProtocolStepMachine::try_from(raw)
    }

    /// The chosen message.
    pub fn message(&self) -> Message {
        self.message
    }

    /// The run parameters.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// The quantum track.
    pub fn quantum(&self) -> &QuantumTrack {
        &self.quantum
    }

    /// The classical track.
    pub fn classical(&self) -> &ClassicalTrack {
        &self.classical
    }

    /// Mutable quantum track, for `seek` and other direct driving.
    pub fn quantum_mut(&mut self) -> &mut QuantumTrack {
        &mut self.quantum
    }

    /// Mutable classical track.
    pub fn classical_mut(&mut self) -> &mut ClassicalTrack {
        &mut self.classical
    }

    /// Switches the message. A different message restarts both tracks.
    pub fn set_message(&mut self, message: Message) -> Result<(), DenseError> {
        if message == self.message {
            return Ok(());
        }
        debug!("message changed {} -> {}; restarting both tracks", self.message, message);
        self.message = message;
        self.quantum = QuantumTrack::new(message, &self.config);
        self.classical = ClassicalTrack::new(message, &self.config)?;
        Ok(())
    }

    /// Returns `track` to its first stage.
    pub fn reset(&mut self, track: Track) {
        match track {
            Track::Quantum => self.quantum.reset(),
            Track::Classical => self.classical.reset(),
        }
    }

    /// Advances `track`, ignoring the call on the terminal stage.
    /// Returns the index of the stage now current.
    pub fn advance(&mut self, track: Track) -> Result<usize, DenseError> {
        match track {
            Track::Quantum => self.quantum.advance().map(StageSequence::index),
            Track::Classical => self.classical.advance().map(StageSequence::index),
        }
    }

    /// Advances `track`, failing with `AlreadyComplete` on the terminal stage.
    pub fn try_advance(&mut self, track: Track) -> Result<usize, DenseError> {
        match track {
            Track::Quantum => self.quantum.try_advance().map(StageSequence::index),
            Track::Classical => self.classical.try_advance().map(StageSequence::index),
        }
    }

    /// Index of the current stage of `track`.
    pub fn stage_index(&self, track: Track) -> usize {
        match track {
            Track::Quantum => self.quantum.stage().index(),
            Track::Classical => self.classical.stage().index(),
        }
    }

    /// Number of stages of `track`.
    pub fn stage_count(&self, track: Track) -> usize {
        match track {
            Track::Quantum => QuantumStage::ALL.len(),
            Track::Classical => ClassicalStage::ALL.len(),
        }
    }

    /// Returns `true` once `track` sits on its terminal stage.
    pub fn is_complete(&self, track: Track) -> bool {
        match track {
            Track::Quantum => self.quantum.is_complete(),
            Track::Classical => self.classical.is_complete(),
        }
    }

    /// Render data for `track` at its current stage.
    pub fn snapshot(&self, track: Track) -> Result<Snapshot, DenseError> {
        match track {
            Track::Quantum => self.quantum.snapshot().map(Snapshot::Quantum),
            Track::Classical => self.classical.snapshot().map(Snapshot::Classical),
        }
    }
}
