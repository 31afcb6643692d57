// src/analytics.rs

//! Batch comparison of the two schemes under noise.
//!
//! The quantum side uses the same educational noise model as the classical
//! one: the two bits Bob reads off the register are passed through the bit-flip
//! channel. Real qubit noise would act on the state before decoding; that is
//! out of scope here.

use crate::circuits::superdense_circuit;
use crate::classical::{transmit, ClassicalBuffer, RepetitionCodec};
use crate::config::ProtocolConfig;
use crate::core::constants::dense_constants::MESSAGE_BITS;
use crate::core::{BasisState, DenseError, Message};
use crate::protocol::{ClassicalStage, ProtocolStepMachine, QuantumStage, StepTrack};
use crate::simulation::QuantumStateEngine;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Success rates of both schemes at one flip probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Channel flip probability.
    pub flip_probability: f64,
    /// Fraction of runs where the repetition code recovered the message.
    pub classical_success: f64,
    /// Fraction of runs where superdense coding recovered the message.
    pub quantum_success: f64,
}

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// `n == 1` yields `[start]`, `n == 0` yields nothing.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| if i == n - 1 { end } else { start + step * i as f64 }).collect()
        }
    }
}

/// The grid the comparison page starts from: 0% to 30% noise in 13 points.
pub fn default_sweep_grid() -> Vec<f64> {
    linspace(0.0, 0.3, 13)
}

/// Monte-Carlo success rates of both schemes over `flip_probabilities`.
///
/// Each probability gets `runs` independent trials of each scheme. All draws
/// come from one source seeded with `config.seed`, so a sweep is reproducible.
/// `config.flip_probability` is ignored; the grid supplies it.
///
/// # Errors
/// `DenseError::InvalidArgument` if `runs` is zero, the repetition factor is
/// invalid, or a grid value lies outside `[0, 1]`.
pub fn noise_sweep(
    message: Message,
    flip_probabilities: &[f64],
    runs: usize,
    config: &ProtocolConfig,
) -> Result<Vec<SweepPoint>, DenseError> {
    if runs == 0 {
        return Err(DenseError::invalid_argument("noise sweep needs at least one run per point"));
    }
    let codec = RepetitionCodec::new(config.repetition_factor)?;

    let mut engine = QuantumStateEngine::new();
    engine.apply_all(superdense_circuit(message).operations())?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points = Vec::with_capacity(flip_probabilities.len());
    for &p in flip_probabilities {
        let mut classical_ok = 0usize;
        let mut quantum_ok = 0usize;
        for _ in 0..runs {
            if codec.round_trip(message, p, &mut rng)? == message {
                classical_ok += 1;
            }

            let measured = engine
                .sample(1, &mut rng)?
                .most_frequent()
                .map(BasisState::to_message)
                .ok_or_else(|| DenseError::invalid_argument("measurement produced no outcome"))?;
            let received = transmit(&ClassicalBuffer::from_message(measured), p, &mut rng)?;
            if received.bits() == message.bits() {
                quantum_ok += 1;
            }
        }
        let point = SweepPoint {
            flip_probability: p,
            classical_success: classical_ok as f64 / runs as f64,
            quantum_success: quantum_ok as f64 / runs as f64,
        };
        debug!("sweep {} p={:.3}: {:?}", message, p, point);
        points.push(point);
    }
    info!("noise sweep for {} finished: {} point(s), {} run(s) each", message, points.len(), runs);
    Ok(points)
}

/// Information carried per physical unit sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// Bits actually sent by the repetition code.
    pub classical_bits_sent: usize,
    /// Qubits actually sent by superdense coding.
    pub qubits_sent: usize,
    /// Message bits per sent bit, `2 / (2k)`.
    pub classical_efficiency: f64,
    /// Message bits per sent qubit, `2 / 1`.
    pub quantum_efficiency: f64,
}

impl EfficiencyMetrics {
    /// Metrics for the repetition factor in `config`.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` if the repetition factor is invalid.
    pub fn for_config(config: &ProtocolConfig) -> Result<Self, DenseError> {
        let sent = RepetitionCodec::new(config.repetition_factor)?.encoded_len();
        Ok(Self {
            classical_bits_sent: sent,
            qubits_sent: 1,
            classical_efficiency: MESSAGE_BITS as f64 / sent as f64,
            quantum_efficiency: MESSAGE_BITS as f64,
        })
    }
}

/// Classical half of a [`TransmissionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalReport {
    /// Encoded bits, e.g. `"000111"`.
    pub encoded: String,
    /// Bits after the channel.
    pub received: String,
    /// Majority-decoded message.
    pub decoded: Message,
    /// Per-group parity flags.
    pub parity_flags: Vec<bool>,
}

/// Quantum half of a [`TransmissionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumReport {
    /// Shots per outcome.
    pub measurement_counts: BTreeMap<BasisState, u64>,
    /// Outcome seen most often.
    pub most_frequent: Option<BasisState>,
}

/// Channel settings of a [`TransmissionReport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseReport {
    /// `true` when the flip probability is non-zero.
    pub enabled: bool,
    /// Per-bit flip probability.
    pub probability: f64,
}

/// Exportable summary of one complete run of both tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionReport {
    /// The message sent.
    pub message: Message,
    /// Repetition-code outcome.
    pub classical: ClassicalReport,
    /// Superdense coding outcome.
    pub quantum: QuantumReport,
    /// Channel settings.
    pub noise: NoiseReport,
    /// Seed used for every random draw of the run.
    pub seed: u64,
    /// Noise sweep, when one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Vec<SweepPoint>>,
}

impl TransmissionReport {
    /// Runs both tracks of a fresh machine to completion and summarizes them.
    ///
    /// # Errors
    /// Any error from building or advancing the machine.
    pub fn from_run(message: Message, config: ProtocolConfig) -> Result<Self, DenseError> {
        let mut machine = ProtocolStepMachine::new(message, config)?;
        machine.quantum_mut().seek(QuantumStage::Measured)?;
        machine.classical_mut().seek(ClassicalStage::Decoded)?;

        let quantum = machine.quantum().snapshot()?;
        let classical = machine.classical().snapshot()?;

        let missing = |what: &str| DenseError::invalid_argument(format!("completed run has no {}", what));
        let measurement = quantum.measurement.ok_or_else(|| missing("measurement"))?;
        Ok(Self {
            message,
            classical: ClassicalReport {
                encoded: classical.sent.ok_or_else(|| missing("encoded buffer"))?.to_string(),
                received: classical.buffer.to_string(),
                decoded: classical.decoded.ok_or_else(|| missing("decoded message"))?,
                parity_flags: classical.parity_flags.ok_or_else(|| missing("parity flags"))?,
            },
            quantum: QuantumReport {
                most_frequent: measurement.most_frequent(),
                measurement_counts: measurement.counts().clone(),
            },
            noise: NoiseReport {
                enabled: config.flip_probability > 0.0,
                probability: config.flip_probability,
            },
            seed: config.seed,
            analytics: None,
        })
    }

    /// Attaches a noise sweep.
    pub fn with_sweep(mut self, sweep: Vec<SweepPoint>) -> Self {
        self.analytics = Some(sweep);
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, DenseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a report previously written with [`to_json_pretty`](Self::to_json_pretty).
    pub fn from_json(json: &str) -> Result<Self, DenseError> {
        Ok(serde_json::from_str(json)?)
    }
}
