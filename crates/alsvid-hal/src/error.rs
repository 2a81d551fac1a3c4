//! Error types for the hardware abstraction crate.

use thiserror::Error;

/// Errors raised by configuration loading and backend transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The configuration file does not satisfy the schema.
    #[error("QPU misconfigured - expected: {expected}, present: {present}")]
    BadQpuConfiguration {
        /// What the schema requires.
        expected: String,
        /// What the file provided.
        present: String,
    },

    /// The backend reports too few good qubits to satisfy the request.
    #[error("insufficient number of good qubits - requested: {requested}, actual: {available}")]
    InsufficientGoodQubits {
        /// Qubits the program needs.
        requested: u32,
        /// Qubits the device currently offers.
        available: u32,
    },

    /// Eager connection at QPU construction failed.
    #[error("connection to QPU backend failed: {0}")]
    ConnectionFailed(String),

    /// An operation needed a backend but none is connected.
    #[error("no backend connection established for this QPU handle")]
    NotConnected,

    /// The backend rejected a request.
    #[error("backend error: {0}")]
    Backend(String),

    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Filesystem failure while reading configuration or certificates.
    #[error("could not read configuration material: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
