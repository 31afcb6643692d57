// src/protocol/quantum.rs

use super::stage::{QuantumStage, StageSequence};
use super::{already_complete, StepTrack};
use crate::circuits::{decode_gates, encode_gates_for, Circuit};
use crate::config::ProtocolConfig;
use crate::core::{BasisState, DenseError, Message, QuantumState};
use crate::simulation::{MeasurementResult, QuantumStateEngine};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to render the quantum track at its current stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumSnapshot {
    /// Current stage.
    pub stage: QuantumStage,
    /// Message being sent.
    pub message: Message,
    /// Register state.
    pub state: QuantumState,
    /// Outcome probabilities of `state`.
    pub probabilities: BTreeMap<BasisState, f64>,
    /// Gates applied so far, starting with the Bell-pair preparation.
    pub circuit: Circuit,
    /// Sampled counts, present once the track is at `Measured`.
    pub measurement: Option<MeasurementResult>,
    /// Bob's reading of the message, present once the track is at `Measured`.
    pub decoded: Option<Message>,
}

/// Step machine of the superdense coding protocol.
///
/// Owns the engine for the active run. Each transition applies exactly the
/// gates of the stage being entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumTrack {
    message: Message,
    shots: u64,
    seed: u64,
    stage: QuantumStage,
    engine: QuantumStateEngine,
}

impl QuantumTrack {
    /// A track at `Init` for `message`, taking shots and seed from `config`.
    pub fn new(message: Message, config: &ProtocolConfig) -> Self {
        let mut engine = QuantumStateEngine::new();
        engine.clear();
        Self {
            message,
            shots: config.shots,
            seed: config.seed,
            stage: QuantumStage::Init,
            engine,
        }
    }

    /// The message being sent.
    pub fn message(&self) -> Message {
        self.message
    }

    /// The underlying engine.
    pub fn engine(&self) -> &QuantumStateEngine {
        &self.engine
    }

    /// Returns `true` if this track runs `message` with the sampling settings of `config`.
    pub(crate) fn runs(&self, message: Message, config: &ProtocolConfig) -> bool {
        self.message == message && self.shots == config.shots && self.seed == config.seed
    }
}

impl StepTrack for QuantumTrack {
    type Stage = QuantumStage;
    type Snapshot = QuantumSnapshot;

    const NAME: &'static str = "quantum";

    fn stage(&self) -> QuantumStage {
        self.stage
    }

    fn try_advance(&mut self) -> Result<QuantumStage, DenseError> {
        let next = self.stage.next().ok_or_else(|| already_complete(Self::NAME, self.stage))?;
        match next {
            QuantumStage::Init | QuantumStage::Transmitted | QuantumStage::Measured => {}
            QuantumStage::Entangled => self.engine.reset(),
            QuantumStage::Encoded => self.engine.apply_all(&encode_gates_for(self.message))?,
            QuantumStage::Decoded => self.engine.apply_all(&decode_gates())?,
        }
        debug!("quantum track ({}): {} -> {}", self.message, self.stage, next);
        self.stage = next;
        Ok(next)
    }

    fn reset(&mut self) {
        self.engine.clear();
        self.stage = QuantumStage::Init;
    }

    fn snapshot(&self) -> Result<QuantumSnapshot, DenseError> {
        let measurement = if self.stage == QuantumStage::Measured {
            Some(self.engine.sample_seeded(self.shots, self.seed)?)
        } else {
            None
        };
        let decoded = measurement.as_ref().and_then(MeasurementResult::decoded_message);
        Ok(QuantumSnapshot {
            stage: self.stage,
            message: self.message,
            state: self.engine.state().clone(),
            probabilities: self.engine.probabilities(),
            circuit: Circuit::from(self.engine.history().to_vec()),
            measurement,
            decoded,
        })
    }
}
