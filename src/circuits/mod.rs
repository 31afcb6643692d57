// src/circuits/mod.rs

//! Ordered gate sequences and the superdense coding wiring.
//!
//! This module provides the `Circuit` structure, an ordered list of
//! [`GateApplication`]s, together with the fixed message-to-gates mapping
//! Alice uses to encode and the sequence Bob uses to decode.

use crate::core::{DenseError, Message, Qubit};
use crate::gates::{GateApplication, GateKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents an ordered sequence of gate applications on the register.
///
/// Analogy: Similar to `qiskit.QuantumCircuit`, minus measurement, which the
/// simulator performs after the last gate.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Circuit {
    /// The ordered sequence of operations. Order is significant.
    operations: Vec<GateApplication>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self { operations: Vec::new() }
    }

    /// Adds a single operation to the end of the circuit's sequence.
    pub fn add_operation(&mut self, op: GateApplication) {
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the circuit's sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = GateApplication>,
    {
        self.operations.extend(ops);
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[GateApplication] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl From<Vec<GateApplication>> for Circuit {
    fn from(operations: Vec<GateApplication>) -> Self {
        Self { operations }
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
#[derive(Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: GateApplication) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = GateApplication>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

//-------------------------------------------------------------------------
// Superdense coding wiring
//-------------------------------------------------------------------------

/// Gates Alice applies to her qubit to encode `message`.
///
/// `00 -> [I]`, `01 -> [X]`, `10 -> [Z]`, `11 -> [X, Z]`. X always comes
/// before Z.
pub fn encode_gates_for(message: Message) -> Vec<GateApplication> {
    let alice = |gate| GateApplication::single(gate, Qubit::Alice);
    match message {
        Message::Zero => vec![alice(GateKind::I)],
        Message::One => vec![alice(GateKind::X)],
        Message::Two => vec![alice(GateKind::Z)],
        Message::Three => vec![alice(GateKind::X), alice(GateKind::Z)],
    }
}

/// [`encode_gates_for`] on a raw symbol such as `"10"`.
///
/// # Errors
/// `DenseError::InvalidArgument` for anything other than `00`, `01`, `10`, `11`.
pub fn encode_gates_for_symbol(symbol: &str) -> Result<Vec<GateApplication>, DenseError> {
    Ok(encode_gates_for(symbol.parse()?))
}

/// Gates Bob applies once Alice's qubit arrives: `CNOT(Alice -> Bob)` then `H(Alice)`.
pub fn decode_gates() -> Vec<GateApplication> {
    vec![
        GateApplication::controlled(GateKind::Cnot, Qubit::Alice, Qubit::Bob),
        GateApplication::single(GateKind::H, Qubit::Alice),
    ]
}

/// Encoding followed by decoding, to be run from the Bell state.
pub fn superdense_circuit(message: Message) -> Circuit {
    CircuitBuilder::new()
        .add_ops(encode_gates_for(message))
        .add_ops(decode_gates())
        .build()
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "densecode::Circuit[0 operations]");
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let rows = Qubit::ALL;

        let max_label_width = rows.iter().map(|q| q.to_string().len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; rows.len()];
        // Vertical connector between the two rows at each time step
        let mut v_connect: Vec<char> = vec![' '; num_ops];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match (op.gate, op.targets.as_slice()) {
                (GateKind::Cnot, [control, target]) => {
                    op_grid[control.slot()][t] = format_gate("@");
                    op_grid[target.slot()][t] = format_gate("X");
                    v_connect[t] = V_WIRE;
                }
                (GateKind::BellPrep, [control, target]) => {
                    op_grid[control.slot()][t] = format_gate("H@");
                    op_grid[target.slot()][t] = format_gate("X");
                    v_connect[t] = V_WIRE;
                }
                (gate, [target]) => {
                    op_grid[target.slot()][t] = format_gate(gate.name());
                }
                // Malformed applications are drawn as unknown on every row they name.
                (_, targets) => {
                    for target in targets {
                        op_grid[target.slot()][t] = format_gate("?");
                    }
                }
            }
        }

        writeln!(f, "densecode::Circuit[{} operations]", num_ops)?;
        for (r, qubit) in rows.iter().enumerate() {
            let label = format!("{}: ", qubit);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < rows.len() - 1 {
                write!(f, "{}", label_padding)?;
                for connector in &v_connect {
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
