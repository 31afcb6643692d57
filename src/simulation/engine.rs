// src/simulation/engine.rs
use crate::core::{BasisState, DenseError, QuantumState, Qubit, DIM, NORM_TOLERANCE};
use crate::gates::{GateApplication, GateKind, GateLibrary, Matrix4};
use crate::simulation::MeasurementResult;
use log::{debug, trace, warn};
use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owns the state of the two-qubit register and evolves it gate by gate.
///
/// Every run starts from the Bell state `(|00> + |11>)/sqrt(2)`, produced by
/// applying `BellPrep(Alice -> Bob)` to `|00>` in [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumStateEngine {
    /// Current amplitude vector. Mutated only by gate application and resets.
    state: QuantumState,
    /// Gates applied since the last reset, in order.
    history: Vec<GateApplication>,
}

impl QuantumStateEngine {
    /// Creates an engine holding the Bell state.
    pub fn new() -> Self {
        let mut engine = Self { state: QuantumState::ground(), history: Vec::new() };
        engine.reset();
        engine
    }

    /// Resets the register to the Bell state. Always succeeds.
    pub fn reset(&mut self) {
        self.clear();
        self.apply_matrix(&GateLibrary::bell_prep_matrix());
        self.history.push(GateApplication::controlled(GateKind::BellPrep, Qubit::Alice, Qubit::Bob));
        debug!("engine reset to Bell state: {}", self.state);
    }

    /// Puts the register back to `|00>`, the state before entanglement.
    pub fn clear(&mut self) {
        self.state = QuantumState::ground();
        self.history.clear();
    }

    /// Applies a library gate looked up by name.
    ///
    /// # Errors
    /// `DenseError::InvalidGate` if `gate_name` is unknown or `targets` does
    /// not match the gate's arity.
    pub fn apply_gate(&mut self, gate_name: &str, targets: &[Qubit]) -> Result<(), DenseError> {
        let gate = GateLibrary::lookup(gate_name)?;
        self.apply(&GateApplication { gate, targets: targets.to_vec() })
    }

    /// Applies a typed gate application.
    pub fn apply(&mut self, application: &GateApplication) -> Result<(), DenseError> {
        let matrix = application.matrix()?;
        self.apply_matrix(&matrix);
        self.history.push(application.clone());
        debug!("applied {}", application);
        Ok(())
    }

    /// Applies every gate of a sequence in order, stopping at the first error.
    pub fn apply_all<'a, I>(&mut self, applications: I) -> Result<(), DenseError>
    where
        I: IntoIterator<Item = &'a GateApplication>,
    {
        for application in applications {
            self.apply(application)?;
        }
        Ok(())
    }

    /// Left-multiplies the state by `matrix`, renormalizing only on drift.
    fn apply_matrix(&mut self, matrix: &Matrix4) {
        let psi = *self.state.amplitudes();
        let mut psi_prime = [Complex::zero(); DIM];
        for (row, out) in psi_prime.iter_mut().enumerate() {
            for (col, amp) in psi.iter().enumerate() {
                *out += matrix[row][col] * amp;
            }
        }
        *self.state.amplitudes_mut() = psi_prime;

        let norm_sq = self.state.norm_sqr();
        if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
            warn!("state norm drifted to {}; renormalizing", norm_sq);
            self.state.normalize();
        }
        trace!("state: {}", self.state);
    }

    /// The current state vector.
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Gates applied since the last reset.
    pub fn history(&self) -> &[GateApplication] {
        &self.history
    }

    /// Probability of each basis outcome. Does not touch the state.
    pub fn probabilities(&self) -> BTreeMap<BasisState, f64> {
        BasisState::ALL.iter().copied().zip(self.state.probabilities()).collect()
    }

    /// Draws `shots` independent measurement outcomes using `rng`.
    ///
    /// Sampling never collapses the engine's state; each call sees the same
    /// distribution.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` if `shots` is zero.
    pub fn sample<R: Rng + ?Sized>(&self, shots: u64, rng: &mut R) -> Result<MeasurementResult, DenseError> {
        if shots == 0 {
            return Err(DenseError::invalid_argument("shots must be greater than zero"));
        }

        let probs = self.state.probabilities();
        let mut cumulative = [0.0; DIM];
        let mut running = 0.0;
        for (c, p) in cumulative.iter_mut().zip(probs.iter()) {
            running += p;
            *c = running;
        }
        // Outcome used when rounding leaves the draw above the last cumulative bound.
        let fallback = probs.iter().rposition(|p| *p > 0.0).unwrap_or(DIM - 1);

        let mut result = MeasurementResult::new();
        for _ in 0..shots {
            let draw: f64 = rng.random::<f64>() * running;
            let index = cumulative.iter().position(|c| draw < *c).unwrap_or(fallback);
            result.record(BasisState::ALL[index]);
        }
        debug!("sampled {} shots: {}", shots, result);
        Ok(result)
    }

    /// [`sample`](Self::sample) with a fresh `StdRng` seeded from `seed`.
    pub fn sample_seeded(&self, shots: u64, seed: u64) -> Result<MeasurementResult, DenseError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.sample(shots, &mut rng)
    }

    /// Overwrites the state without recording a gate.
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: QuantumState) {
        self.state = state;
    }
}

impl Default for QuantumStateEngine {
    fn default() -> Self {
        Self::new()
    }
}
