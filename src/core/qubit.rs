// src/core/qubit.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two slots of the register.
///
/// Alice holds the qubit that gets encoded and sent; Bob keeps his half of the
/// Bell pair until Alice's qubit arrives. In a basis label `"ab"` Alice's bit
/// is written first and is the high bit of the basis index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qubit {
    /// Register slot 0, the transmitted qubit.
    Alice,
    /// Register slot 1, the qubit Bob keeps.
    Bob,
}

impl Qubit {
    /// Both qubits in register order.
    pub const ALL: [Qubit; 2] = [Qubit::Alice, Qubit::Bob];

    /// Position of this qubit in the register (0 for Alice, 1 for Bob).
    pub fn slot(self) -> usize {
        match self {
            Qubit::Alice => 0,
            Qubit::Bob => 1,
        }
    }

    /// Bit position of this qubit inside a basis index (1 for Alice, 0 for Bob).
    pub(crate) fn bit_position(self) -> usize {
        super::constants::dense_constants::NUM_QUBITS - 1 - self.slot()
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qubit::Alice => write!(f, "q_alice"),
            Qubit::Bob => write!(f, "q_bob"),
        }
    }
}
