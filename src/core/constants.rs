//! Numeric constants shared by the simulator and the codec.

/// Constants of the two-qubit register and protocol defaults.
pub mod dense_constants {
    /// Number of qubits in the register (Alice's and Bob's).
    pub const NUM_QUBITS: usize = 2;
    /// Dimension of the state vector, `2^NUM_QUBITS`.
    pub const DIM: usize = 4;
    /// Amplitude of each Bell-state component, `1/sqrt(2)`.
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
    /// Allowed drift of the squared norm before the engine renormalizes.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Number of bits in a protocol message.
    pub const MESSAGE_BITS: usize = 2;
    /// Default repetition factor of the classical code.
    pub const DEFAULT_REPETITION_FACTOR: usize = 3;
    /// Largest repetition factor the codec accepts.
    pub const MAX_REPETITION_FACTOR: usize = 1001;
    /// Default number of measurement shots.
    pub const DEFAULT_SHOTS: u64 = 1000;
    /// Default seed for sampling and channel noise.
    pub const DEFAULT_SEED: u64 = 42;
}
