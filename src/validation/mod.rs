// src/validation/mod.rs

//! Provides functions to validate `QuantumState` values and gate matrices.

use crate::core::{DenseError, QuantumState, DIM, NORM_TOLERANCE};
use crate::gates::Matrix4;
use num_complex::Complex;
use num_traits::{One, Zero};

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `QuantumState` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `NORM_TOLERANCE` (1e-9).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(DenseError::InvalidArgument)` if normalization fails.
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<(), DenseError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(DenseError::invalid_argument(format!(
            "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Checks that the probabilities of a state sum to one and are each in `[0, 1]`.
pub fn validate_state(state: &QuantumState) -> Result<(), DenseError> {
    check_normalization(state, None)?;
    for (k, p) in state.probabilities().iter().enumerate() {
        if !p.is_finite() || *p < -NORM_TOLERANCE || *p > 1.0 + NORM_TOLERANCE {
            return Err(DenseError::invalid_argument(format!(
                "Outcome {} has probability {} outside [0, 1]",
                k, p
            )));
        }
    }
    Ok(())
}

/// Returns `true` if `m^dagger * m` is the identity within `tolerance`.
pub fn is_unitary(m: &Matrix4, tolerance: f64) -> bool {
    for i in 0..DIM {
        for j in 0..DIM {
            let mut entry: Complex<f64> = Complex::zero();
            for k in 0..DIM {
                entry += m[k][i].conj() * m[k][j];
            }
            let expected: Complex<f64> = if i == j { Complex::one() } else { Complex::zero() };
            if (entry - expected).norm() > tolerance {
                return false;
            }
        }
    }
    true
}
