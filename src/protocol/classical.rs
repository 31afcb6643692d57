// src/protocol/classical.rs

use super::stage::{ClassicalStage, StageSequence};
use super::{already_complete, StepTrack};
use crate::classical::{transmit, ClassicalBuffer, RepetitionCodec};
use crate::config::ProtocolConfig;
use crate::core::{DenseError, Message};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Everything needed to render the classical track at its current stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalSnapshot {
    /// Current stage.
    pub stage: ClassicalStage,
    /// Message being sent.
    pub message: Message,
    /// The buffer as it stands at this stage: raw bits, encoded, or received.
    pub buffer: ClassicalBuffer,
    /// Encoded buffer before the channel, once encoded.
    pub sent: Option<ClassicalBuffer>,
    /// Positions the channel flipped, once transmitted.
    pub flipped_positions: Vec<usize>,
    /// Per-group parity flags, once error-checked.
    pub parity_flags: Option<Vec<bool>>,
    /// Majority-decoded message, once decoded.
    pub decoded: Option<Message>,
}

/// Step machine of the repetition-code comparison.
///
/// Holds only the run parameters and the stage index; snapshots replay
/// encode, transmit, check and decode up to the current stage. The channel
/// draws from a source seeded with the configured seed, so every replay sees
/// the same noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalTrack {
    message: Message,
    codec: RepetitionCodec,
    flip_probability: f64,
    seed: u64,
    stage: ClassicalStage,
}

impl ClassicalTrack {
    /// A track at `Init` for `message`.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` if the configured repetition factor is invalid.
    pub fn new(message: Message, config: &ProtocolConfig) -> Result<Self, DenseError> {
        Ok(Self {
            message,
            codec: RepetitionCodec::new(config.repetition_factor)?,
            flip_probability: config.flip_probability,
            seed: config.seed,
            stage: ClassicalStage::Init,
        })
    }

    /// The message being sent.
    pub fn message(&self) -> Message {
        self.message
    }

    /// The codec in use.
    pub fn codec(&self) -> &RepetitionCodec {
        &self.codec
    }

    /// Returns `true` if this track runs `message` with the codec and channel of `config`.
    pub(crate) fn runs(&self, message: Message, config: &ProtocolConfig) -> bool {
        self.message == message
            && self.codec.repetition_factor() == config.repetition_factor
            && self.flip_probability == config.flip_probability
            && self.seed == config.seed
    }

    fn replay(&self, upto: ClassicalStage) -> Result<ClassicalSnapshot, DenseError> {
        let mut snapshot = ClassicalSnapshot {
            stage: upto,
            message: self.message,
            buffer: ClassicalBuffer::from_message(self.message),
            sent: None,
            flipped_positions: Vec::new(),
            parity_flags: None,
            decoded: None,
        };
        if upto < ClassicalStage::Encoded {
            return Ok(snapshot);
        }

        let sent = self.codec.encode(self.message)?;
        snapshot.buffer = sent.clone();
        snapshot.sent = Some(sent.clone());
        if upto < ClassicalStage::Transmitted {
            return Ok(snapshot);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let received = transmit(&sent, self.flip_probability, &mut rng)?;
        snapshot.flipped_positions = sent.flipped_positions(&received);
        snapshot.buffer = received;
        if upto < ClassicalStage::ErrorChecked {
            return Ok(snapshot);
        }

        let decoded = self.codec.decode(&snapshot.buffer)?;
        snapshot.parity_flags = Some(decoded.parity_flags.clone());
        if upto < ClassicalStage::Decoded {
            return Ok(snapshot);
        }

        snapshot.decoded = Some(decoded.message()?);
        Ok(snapshot)
    }
}

impl StepTrack for ClassicalTrack {
    type Stage = ClassicalStage;
    type Snapshot = ClassicalSnapshot;

    const NAME: &'static str = "classical";

    fn stage(&self) -> ClassicalStage {
        self.stage
    }

    fn try_advance(&mut self) -> Result<ClassicalStage, DenseError> {
        let next = self.stage.next().ok_or_else(|| already_complete(Self::NAME, self.stage))?;
        // Surface codec errors at the transition rather than at render time.
        self.replay(next)?;
        debug!("classical track ({}): {} -> {}", self.message, self.stage, next);
        self.stage = next;
        Ok(next)
    }

    fn reset(&mut self) {
        self.stage = ClassicalStage::Init;
    }

    fn snapshot(&self) -> Result<ClassicalSnapshot, DenseError> {
        self.replay(self.stage)
    }
}
