//! Error types for the compilation crate.

use alsvid_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors raised by the compilation passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The configured terminal pass is not a recognized pass name.
    #[error("unrecognized compiler pass '{0}'")]
    UnknownCompilerPass(String),

    /// The virtual register does not fit the device.
    #[error("not enough qubits available - requested: {requested}, present: {available}")]
    NotEnoughQubits {
        /// Number of virtual qubits requested.
        requested: u32,
        /// Number of physical qubits available.
        available: u32,
    },

    /// No routing path exists between two physical qubits.
    #[error("qubits not physically connected - qa: {qa}, qb: {qb}")]
    QubitsNotConnected {
        /// One endpoint.
        qa: QubitId,
        /// The other endpoint.
        qb: QubitId,
    },

    /// Topology type unknown, or its structural invariant failed.
    #[error("machine topology different from specified - {0}")]
    BadTopologyType(String),

    /// Instruction-level failure surfaced by a pass.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
