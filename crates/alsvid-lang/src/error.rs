//! Error types for the user-facing crate.

use alsvid_compile::CompileError;
use alsvid_hal::HalError;
use alsvid_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors raised by contexts, registers, and preparation blocks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LangError {
    /// The classical register was queried before any absorb.
    #[error("no measurements available yet in the current classical register")]
    NoMeasurementsAvailable,

    /// Preparation bitstring does not cover the targets.
    #[error("bitstring length {got} does not match target count {expected}")]
    BitstringLength {
        /// Number of targets.
        expected: usize,
        /// Characters in the bitstring.
        got: usize,
    },

    /// Preparation bitstring contains characters outside {0, 1}.
    #[error("bitstring must contain only '0' and '1', got '{0}'")]
    BadBitstring(String),

    /// Amplitude vector length is not a power of two matching the targets.
    #[error("state vector length {got} does not match 2^{qubits} = {expected}")]
    StateLength {
        /// Number of target qubits.
        qubits: usize,
        /// Required amplitude count.
        expected: usize,
        /// Provided amplitude count.
        got: usize,
    },

    /// Amplitude vector cannot be normalized.
    #[error("state vector has zero norm")]
    ZeroNormState,

    /// Uniform preparation asked for qubits outside the target set.
    #[error("qubits {0:?} are not a subset of the preparation targets")]
    NotASubset(Vec<QubitId>),

    /// Instruction-level failure.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Compilation failure.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Configuration or backend failure.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for user-facing operations.
pub type LangResult<T> = Result<T, LangError>;
