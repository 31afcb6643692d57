// src/simulation/mod.rs

//! Exact state-vector simulation of the two-qubit register.
//! This module contains the `Simulator` entry point and the
//! `QuantumStateEngine` that owns and evolves the state.

mod engine;
mod results;

// Re-export the main public interface types
pub use engine::QuantumStateEngine;
pub use results::{MeasurementResult, SimulationResult};

use crate::circuits::Circuit;
use crate::core::constants::dense_constants::{DEFAULT_SEED, DEFAULT_SHOTS};
use crate::core::DenseError;
use log::debug;

/// Runs whole circuits from the Bell state and measures the result.
#[derive(Debug, Clone)]
pub struct Simulator {
    shots: u64,
    seed: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { shots: DEFAULT_SHOTS, seed: DEFAULT_SEED }
    }
}

impl Simulator {
    /// Creates a new Simulator with default settings (1000 shots, seed 42).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of measurement shots.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Sets the seed of the sampling source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs a simulation of the provided circuit.
    ///
    /// The engine is reset to the Bell state, every gate of `circuit` is
    /// applied in order and the final state is sampled `shots` times.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` with final state, probabilities and counts.
    /// * `Err(DenseError)` if a gate is malformed or `shots` is zero.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult, DenseError> {
        let mut engine = QuantumStateEngine::new();
        engine.apply_all(circuit.operations())?;
        let measurement = engine.sample_seeded(self.shots, self.seed)?;
        debug!("circuit of {} gate(s) finished: {}", circuit.len(), measurement);
        Ok(SimulationResult {
            final_state: engine.state().clone(),
            probabilities: engine.probabilities(),
            measurement,
        })
    }
}
