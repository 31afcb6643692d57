// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod message;
pub mod qubit;
pub mod state;

// Re-export public types for convenient access via `densecode::core::TypeName`
pub use error::DenseError;
pub use message::{BasisState, Message};
pub use qubit::Qubit;
pub use state::QuantumState;

pub mod constants;
pub use constants::dense_constants::{DIM, FRAC_1_SQRT_2, NORM_TOLERANCE}; // Re-export
