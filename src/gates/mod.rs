// src/gates/mod.rs

//! The fixed gate library of the superdense coding protocol.
//!
//! Single-qubit gates are stored as 2x2 matrices and padded to the full
//! register by tensoring with identity on the other slot. Two-qubit gates are
//! built directly as 4x4 matrices. Every matrix handed to the engine is an
//! explicit 4x4 unitary acting on the basis `|00>, |01>, |10>, |11>`.

use crate::core::{DenseError, Qubit, DIM, FRAC_1_SQRT_2};
use num_complex::Complex;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2x2 complex matrix acting on one qubit.
pub type Matrix2 = [[Complex<f64>; 2]; 2];
/// 4x4 complex matrix acting on the whole register.
pub type Matrix4 = [[Complex<f64>; DIM]; DIM];

/// Names of the gates in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Identity, Alice's encoding for message `00`.
    I,
    /// Bit flip.
    X,
    /// Phase flip.
    Z,
    /// Hadamard.
    H,
    /// Controlled NOT, targets `[control, target]`.
    Cnot,
    /// `H(control)` followed by `CNOT(control -> target)`. Prepares the Bell pair.
    BellPrep,
}

impl GateKind {
    /// Every gate in the library.
    pub const ALL: [GateKind; 6] = [GateKind::I, GateKind::X, GateKind::Z, GateKind::H, GateKind::Cnot, GateKind::BellPrep];

    /// Canonical name used for lookup and display.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::I => "I",
            GateKind::X => "X",
            GateKind::Z => "Z",
            GateKind::H => "H",
            GateKind::Cnot => "CNOT",
            GateKind::BellPrep => "BellPrep",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn arity(self) -> usize {
        match self {
            GateKind::I | GateKind::X | GateKind::Z | GateKind::H => 1,
            GateKind::Cnot | GateKind::BellPrep => 2,
        }
    }

    /// The 2x2 matrix of a single-qubit gate, `None` for two-qubit gates.
    pub fn single_qubit_matrix(self) -> Option<Matrix2> {
        let one = Complex::one();
        let zero = Complex::zero();
        match self {
            GateKind::I => Some([[one, zero], [zero, one]]),
            GateKind::X => Some([[zero, one], [one, zero]]),
            GateKind::Z => Some([[one, zero], [zero, -one]]),
            GateKind::H => Some(hadamard()),
            GateKind::Cnot | GateKind::BellPrep => None,
        }
    }
}

impl FromStr for GateKind {
    type Err = DenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "ID" => Ok(GateKind::I),
            "X" => Ok(GateKind::X),
            "Z" => Ok(GateKind::Z),
            "H" => Ok(GateKind::H),
            "CNOT" | "CX" => Ok(GateKind::Cnot),
            "BELLPREP" => Ok(GateKind::BellPrep),
            _ => Err(DenseError::invalid_gate(format!("Gate '{}' is not in the library", s))),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate together with the qubits it acts on.
///
/// For two-qubit gates the targets are `[control, target]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateApplication {
    /// The gate to apply.
    pub gate: GateKind,
    /// The qubits the gate acts on, in gate order.
    pub targets: Vec<Qubit>,
}

impl GateApplication {
    /// A single-qubit gate on `target`.
    pub fn single(gate: GateKind, target: Qubit) -> Self {
        Self { gate, targets: vec![target] }
    }

    /// A two-qubit gate with the given control and target.
    pub fn controlled(gate: GateKind, control: Qubit, target: Qubit) -> Self {
        Self { gate, targets: vec![control, target] }
    }

    /// Full-register matrix of this application.
    pub fn matrix(&self) -> Result<Matrix4, DenseError> {
        GateLibrary::expand(self.gate, &self.targets)
    }
}

impl fmt::Display for GateApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate)?;
        for (i, q) in self.targets.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { " -> " } else { "" }, q)?;
        }
        write!(f, ")")
    }
}

/// Lookup and tensor expansion of library gates.
pub struct GateLibrary;

impl GateLibrary {
    /// Looks a gate up by name.
    ///
    /// # Errors
    /// `DenseError::InvalidGate` for names outside the library.
    pub fn lookup(name: &str) -> Result<GateKind, DenseError> {
        name.parse()
    }

    /// Expands `gate` acting on `targets` to a 4x4 matrix on the register.
    ///
    /// # Errors
    /// `DenseError::InvalidGate` if the number of targets differs from the
    /// gate's arity or a two-qubit gate names the same qubit twice.
    pub fn expand(gate: GateKind, targets: &[Qubit]) -> Result<Matrix4, DenseError> {
        if targets.len() != gate.arity() {
            return Err(DenseError::invalid_gate(format!(
                "Gate {} acts on {} qubit(s) but {} target(s) were given",
                gate,
                gate.arity(),
                targets.len()
            )));
        }
        match gate {
            GateKind::I | GateKind::X | GateKind::Z | GateKind::H => {
                let u = gate
                    .single_qubit_matrix()
                    .ok_or_else(|| DenseError::invalid_gate(format!("Gate {} has no 2x2 form", gate)))?;
                Ok(place_single(&u, targets[0]))
            }
            GateKind::Cnot => {
                let (control, target) = distinct_pair(gate, targets)?;
                Ok(cnot(control, target))
            }
            GateKind::BellPrep => {
                let (control, target) = distinct_pair(gate, targets)?;
                Ok(bell_prep(control, target))
            }
        }
    }

    /// `BellPrep(Alice -> Bob)`, the preparation used when a run is reset.
    pub fn bell_prep_matrix() -> Matrix4 {
        bell_prep(Qubit::Alice, Qubit::Bob)
    }
}

fn bell_prep(control: Qubit, target: Qubit) -> Matrix4 {
    let h = place_single(&hadamard(), control);
    mat_mul(&cnot(control, target), &h)
}

fn hadamard() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn distinct_pair(gate: GateKind, targets: &[Qubit]) -> Result<(Qubit, Qubit), DenseError> {
    let (control, target) = (targets[0], targets[1]);
    if control == target {
        return Err(DenseError::invalid_gate(format!(
            "Control and target of {} cannot both be {}",
            gate, control
        )));
    }
    Ok((control, target))
}

/// `U (x) I` for Alice, `I (x) U` for Bob.
fn place_single(u: &Matrix2, target: Qubit) -> Matrix4 {
    let shift = target.bit_position();
    let mut m = [[Complex::zero(); DIM]; DIM];
    for (row, m_row) in m.iter_mut().enumerate() {
        for (col, entry) in m_row.iter_mut().enumerate() {
            // The untouched qubit must agree between row and column.
            if (row ^ col) & !(1 << shift) != 0 {
                continue;
            }
            *entry = u[(row >> shift) & 1][(col >> shift) & 1];
        }
    }
    m
}

/// Permutation matrix flipping `target` on basis states where `control` is 1.
fn cnot(control: Qubit, target: Qubit) -> Matrix4 {
    let mut m = [[Complex::zero(); DIM]; DIM];
    for input in 0..DIM {
        let output = if (input >> control.bit_position()) & 1 == 1 {
            input ^ (1 << target.bit_position())
        } else {
            input
        };
        m[output][input] = Complex::one();
    }
    m
}

/// Matrix product `a * b`.
fn mat_mul(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [[Complex::zero(); DIM]; DIM];
    for (i, out_row) in out.iter_mut().enumerate() {
        for (j, entry) in out_row.iter_mut().enumerate() {
            for k in 0..DIM {
                *entry += a[i][k] * b[k][j];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_unitary;

    #[test]
    fn lookup_accepts_aliases_and_rejects_unknown() {
        assert_eq!(GateLibrary::lookup("cx").unwrap(), GateKind::Cnot);
        assert_eq!(GateLibrary::lookup("id").unwrap(), GateKind::I);
        assert_eq!(GateLibrary::lookup("BellPrep").unwrap(), GateKind::BellPrep);
        assert!(matches!(GateLibrary::lookup("Y"), Err(DenseError::InvalidGate { .. })));
    }

    #[test]
    fn every_expansion_is_unitary() {
        for gate in GateKind::ALL {
            let target_sets: Vec<Vec<Qubit>> = if gate.arity() == 1 {
                vec![vec![Qubit::Alice], vec![Qubit::Bob]]
            } else {
                vec![vec![Qubit::Alice, Qubit::Bob], vec![Qubit::Bob, Qubit::Alice]]
            };
            for targets in target_sets {
                let m = GateLibrary::expand(gate, &targets).unwrap();
                assert!(is_unitary(&m, 1e-12), "{} on {:?} is not unitary", gate, targets);
            }
        }
    }

    #[test]
    fn x_on_alice_flips_high_bit() {
        let m = GateLibrary::expand(GateKind::X, &[Qubit::Alice]).unwrap();
        // |00> -> |10>, |01> -> |11>
        assert_eq!(m[2][0], Complex::one());
        assert_eq!(m[3][1], Complex::one());
        assert_eq!(m[0][0], Complex::zero());
    }

    #[test]
    fn x_on_bob_flips_low_bit() {
        let m = GateLibrary::expand(GateKind::X, &[Qubit::Bob]).unwrap();
        assert_eq!(m[1][0], Complex::one());
        assert_eq!(m[3][2], Complex::one());
    }

    #[test]
    fn cnot_alice_controls_bob() {
        let m = GateLibrary::expand(GateKind::Cnot, &[Qubit::Alice, Qubit::Bob]).unwrap();
        assert_eq!(m[0][0], Complex::one());
        assert_eq!(m[1][1], Complex::one());
        assert_eq!(m[3][2], Complex::one());
        assert_eq!(m[2][3], Complex::one());
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        assert!(matches!(
            GateLibrary::expand(GateKind::H, &[Qubit::Alice, Qubit::Bob]),
            Err(DenseError::InvalidGate { .. })
        ));
        assert!(matches!(GateLibrary::expand(GateKind::Cnot, &[Qubit::Alice]), Err(DenseError::InvalidGate { .. })));
        assert!(matches!(
            GateLibrary::expand(GateKind::Cnot, &[Qubit::Bob, Qubit::Bob]),
            Err(DenseError::InvalidGate { .. })
        ));
        assert!(matches!(GateLibrary::expand(GateKind::I, &[]), Err(DenseError::InvalidGate { .. })));
    }

    #[test]
    fn bell_prep_maps_ground_to_bell_column() {
        let m = GateLibrary::expand(GateKind::BellPrep, &[Qubit::Alice, Qubit::Bob]).unwrap();
        // First column is the image of |00>.
        assert!((m[0][0].re - FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(m[1][0].norm() < 1e-12);
        assert!(m[2][0].norm() < 1e-12);
        assert!((m[3][0].re - FRAC_1_SQRT_2).abs() < 1e-12);
    }
}
