//! Error handling logic

use thiserror::Error;

/// Error types raised by the protocol engine.
///
/// Every variant is raised synchronously at the offending call. None of them
/// are worth retrying: the simulation is deterministic given its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenseError {
    /// Malformed caller input: bad message symbol, out-of-range probability,
    /// zero shot count, misaligned buffer length, invalid repetition factor.
    #[error("Invalid Argument: {message}")]
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// Unknown gate name or a target list inconsistent with the gate's arity.
    /// Indicates a wiring bug and should not be recovered from within a run.
    #[error("Invalid Gate: {message}")]
    InvalidGate {
        /// InvalidGate failure message
        message: String,
    },

    /// A strict advance was requested on a track already at its terminal stage.
    #[error("Already Complete: {track} track is at its terminal stage '{stage}'")]
    AlreadyComplete {
        /// Name of the track ("quantum" or "classical")
        track: String,
        /// Title of the terminal stage
        stage: String,
    },

    /// Failure to read a configuration or write a report.
    #[error("Serialization Error: {message}")]
    Serialization {
        /// Serialization failure message
        message: String,
    },
}

impl DenseError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        DenseError::InvalidArgument { message: message.into() }
    }

    pub(crate) fn invalid_gate(message: impl Into<String>) -> Self {
        DenseError::InvalidGate { message: message.into() }
    }
}

impl From<serde_json::Error> for DenseError {
    fn from(err: serde_json::Error) -> Self {
        DenseError::Serialization { message: err.to_string() }
    }
}
