// src/protocol/stage.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed, ordered list of stages a track walks through exactly once.
pub trait StageSequence: Copy + Eq + Ord + fmt::Debug + fmt::Display + 'static {
    /// Every stage in declared order.
    const ALL: &'static [Self];

    /// Short title shown next to the "Next" control.
    fn title(self) -> &'static str;

    /// One-line explanation of what happens at this stage.
    fn description(self) -> &'static str;

    /// Position of this stage in [`ALL`](Self::ALL).
    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The stage after this one, `None` on the terminal stage.
    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Returns `true` for the last stage.
    fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// The first stage.
    fn initial() -> Self {
        Self::ALL[0]
    }
}

/// Stages of the superdense coding track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuantumStage {
    /// Register in `|00>`.
    Init,
    /// Bell pair shared between Alice and Bob.
    Entangled,
    /// Alice has applied her message gates.
    Encoded,
    /// Alice's qubit has reached Bob.
    Transmitted,
    /// Bob has applied CNOT and H.
    Decoded,
    /// Both qubits measured.
    Measured,
}

impl StageSequence for QuantumStage {
    const ALL: &'static [Self] = &[
        QuantumStage::Init,
        QuantumStage::Entangled,
        QuantumStage::Encoded,
        QuantumStage::Transmitted,
        QuantumStage::Decoded,
        QuantumStage::Measured,
    ];

    fn title(self) -> &'static str {
        match self {
            QuantumStage::Init => "Prepare register",
            QuantumStage::Entangled => "Create Bell pair",
            QuantumStage::Encoded => "Encode message",
            QuantumStage::Transmitted => "Send Alice's qubit",
            QuantumStage::Decoded => "Decode",
            QuantumStage::Measured => "Measure both qubits",
        }
    }

    fn description(self) -> &'static str {
        match self {
            QuantumStage::Init => "Both qubits start in |00>.",
            QuantumStage::Entangled => "H on Alice's qubit, then CNOT (Alice -> Bob), giving (|00> + |11>)/sqrt(2).",
            QuantumStage::Encoded => "Alice applies X to her qubit if b2 = 1, then Z if b1 = 1.",
            QuantumStage::Transmitted => "Alice's single qubit travels to Bob; no gate is applied.",
            QuantumStage::Decoded => "Bob applies CNOT (Alice -> Bob), then H on Alice's qubit.",
            QuantumStage::Measured => "Bob measures both qubits and reads the message.",
        }
    }
}

impl fmt::Display for QuantumStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Stages of the classical repetition-code track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassicalStage {
    /// Raw message bits.
    Init,
    /// Repetition-encoded buffer.
    Encoded,
    /// Buffer after the noisy channel.
    Transmitted,
    /// Parity flags computed.
    ErrorChecked,
    /// Majority-decoded message.
    Decoded,
}

impl StageSequence for ClassicalStage {
    const ALL: &'static [Self] = &[
        ClassicalStage::Init,
        ClassicalStage::Encoded,
        ClassicalStage::Transmitted,
        ClassicalStage::ErrorChecked,
        ClassicalStage::Decoded,
    ];

    fn title(self) -> &'static str {
        match self {
            ClassicalStage::Init => "Input message",
            ClassicalStage::Encoded => "Apply repetition code",
            ClassicalStage::Transmitted => "Transmit over the channel",
            ClassicalStage::ErrorChecked => "Check for errors",
            ClassicalStage::Decoded => "Correct and output",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ClassicalStage::Init => "The original 2-bit message.",
            ClassicalStage::Encoded => "Each bit is repeated k times.",
            ClassicalStage::Transmitted => "Each bit flips independently with probability p.",
            ClassicalStage::ErrorChecked => "Groups whose bits disagree are flagged.",
            ClassicalStage::Decoded => "Majority vote per group recovers the message.",
        }
    }
}

impl fmt::Display for ClassicalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
