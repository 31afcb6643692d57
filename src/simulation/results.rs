// src/simulation/results.rs
use crate::core::{BasisState, Message, QuantumState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Observed counts from repeated measurement of the register.
///
/// Only outcomes that occurred at least once are stored; [`count`](Self::count)
/// reports zero for the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementResult {
    shots: u64,
    counts: BTreeMap<BasisState, u64>,
}

impl MeasurementResult {
    /// An empty tally.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Counts one shot landing on `outcome`.
    pub(crate) fn record(&mut self, outcome: BasisState) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.shots += 1;
    }

    /// Total number of shots taken.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of times `outcome` was observed.
    pub fn count(&self, outcome: BasisState) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Observed fraction of shots for `outcome`.
    pub fn frequency(&self, outcome: BasisState) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(outcome) as f64 / self.shots as f64
    }

    /// Returns a reference to the map of observed outcomes.
    pub fn counts(&self) -> &BTreeMap<BasisState, u64> {
        &self.counts
    }

    /// The outcome seen most often; ties go to the lower basis index.
    pub fn most_frequent(&self) -> Option<BasisState> {
        let mut best: Option<(BasisState, u64)> = None;
        for (outcome, count) in &self.counts {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((*outcome, *count));
            }
        }
        best.map(|(outcome, _)| outcome)
    }

    /// Bob's reading of the message: the most frequent outcome's bit pattern.
    pub fn decoded_message(&self) -> Option<Message> {
        self.most_frequent().map(BasisState::to_message)
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (outcome, count)) in self.counts.iter().enumerate() {
            write!(f, "{}'{}': {}", if i > 0 { ", " } else { "" }, outcome, count)?;
        }
        write!(f, "}}")
    }
}

/// Holds the results of a full circuit simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// State after the last gate, before measurement.
    pub final_state: QuantumState,
    /// Outcome probabilities of `final_state`.
    pub probabilities: BTreeMap<BasisState, f64>,
    /// Sampled counts.
    pub measurement: MeasurementResult,
}

impl SimulationResult {
    /// Probability of a single outcome in the final state.
    pub fn probability(&self, outcome: BasisState) -> f64 {
        self.probabilities.get(&outcome).copied().unwrap_or(0.0)
    }

    /// The outcome with the largest probability in the final state.
    pub fn most_likely(&self) -> Option<BasisState> {
        let mut best: Option<(BasisState, f64)> = None;
        for (outcome, p) in &self.probabilities {
            if best.is_none_or(|(_, q)| *p > q) {
                best = Some((*outcome, *p));
            }
        }
        best.map(|(outcome, _)| outcome)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        writeln!(f, "  Final state: {}", self.final_state)?;
        writeln!(f, "  Probabilities:")?;
        for (outcome, p) in &self.probabilities {
            writeln!(f, "    {}: {:.4}", outcome, p)?;
        }
        writeln!(f, "  Counts ({} shots): {}", self.measurement.shots(), self.measurement)?;
        Ok(())
    }
}
