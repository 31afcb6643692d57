// src/core/state.rs

use super::constants::dense_constants::{DIM, FRAC_1_SQRT_2};
use super::message::BasisState;
use num_complex::Complex;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amplitude vector of the two-qubit register.
///
/// Entries are indexed by [`BasisState`]: `|00>, |01>, |10>, |11>` with
/// Alice's bit first. The engine keeps the squared norm at 1 within
/// tolerance; constructors here do not enforce it so intermediate and test
/// states can be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] // Avoid Eq for floating-point complex numbers
pub struct QuantumState {
    amplitudes: [Complex<f64>; DIM],
}

impl QuantumState {
    /// Creates a state from raw amplitudes.
    pub fn new(amplitudes: [Complex<f64>; DIM]) -> Self {
        Self { amplitudes }
    }

    /// The computational basis state `|k>`.
    pub fn basis(state: BasisState) -> Self {
        let mut amplitudes = [Complex::zero(); DIM];
        amplitudes[state.index()] = Complex::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// The register before entanglement, `|00>`.
    pub fn ground() -> Self {
        Self::basis(BasisState::ALL[0])
    }

    /// The Bell state `(|00> + |11>)/sqrt(2)`.
    pub fn bell() -> Self {
        let a = Complex::new(FRAC_1_SQRT_2, 0.0);
        Self::new([a, Complex::zero(), Complex::zero(), a])
    }

    /// Read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>; DIM] {
        &self.amplitudes
    }

    /// Amplitude of a single basis state.
    pub fn amplitude(&self, state: BasisState) -> Complex<f64> {
        self.amplitudes[state.index()]
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>; DIM] {
        &mut self.amplitudes
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Rescales the vector to unit norm. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for c in self.amplitudes.iter_mut() {
                *c /= norm;
            }
        }
    }

    /// Inner product `<self|other>`, conjugating `self`.
    pub fn inner(&self, other: &QuantumState) -> Complex<f64> {
        self.amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Squared overlap `|<self|other>|^2`; 1.0 for equal states up to global phase.
    pub fn fidelity(&self, other: &QuantumState) -> f64 {
        self.inner(other).norm_sqr()
    }

    /// Outcome probabilities in basis order.
    pub fn probabilities(&self) -> [f64; DIM] {
        let mut probs = [0.0; DIM];
        for (p, c) in probs.iter_mut().zip(self.amplitudes.iter()) {
            *p = c.norm_sqr();
        }
        probs
    }
}

impl Default for QuantumState {
    fn default() -> Self {
        Self::bell()
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (state, c) in BasisState::ALL.iter().zip(self.amplitudes.iter()) {
            if c.norm_sqr() < 1e-24 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "({:.4})|{}>", c, state)?;
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_state_is_normalized_and_balanced() {
        let bell = QuantumState::bell();
        assert!((bell.norm_sqr() - 1.0).abs() < 1e-12);
        let p = bell.probabilities();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!(p[1].abs() < 1e-12);
        assert!(p[2].abs() < 1e-12);
        assert!((p[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inner_product_conjugates_left_side() {
        let i = Complex::i();
        let a = QuantumState::new([i, Complex::zero(), Complex::zero(), Complex::zero()]);
        let b = QuantumState::ground();
        assert_eq!(a.inner(&b), -i);
        assert!((a.fidelity(&b) - 1.0).abs() < 1e-12);
        assert!(QuantumState::basis(BasisState::ALL[1]).fidelity(&b).abs() < 1e-12);
    }

    #[test]
    fn normalize_rescales_and_ignores_zero() {
        let mut s = QuantumState::new([Complex::new(3.0, 0.0), Complex::new(0.0, 4.0), Complex::zero(), Complex::zero()]);
        s.normalize();
        assert!((s.norm_sqr() - 1.0).abs() < 1e-12);
        assert!((s.amplitudes()[0].re - 0.6).abs() < 1e-12);

        let mut zero = QuantumState::new([Complex::zero(); DIM]);
        zero.normalize();
        assert_eq!(zero.norm_sqr(), 0.0);
    }

    #[test]
    fn display_skips_empty_components() {
        assert_eq!(QuantumState::ground().to_string(), "(1.0000+0.0000i)|00>");
    }
}
