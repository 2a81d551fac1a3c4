//! Error types for QASM emission.

use alsvid_ir::Symbol;
use thiserror::Error;

/// Errors raised while emitting OpenQASM 3.0.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The symbol has no QASM mnemonic.
    #[error("unrecognized instruction '{0}'")]
    UnknownInstruction(Symbol),

    /// The instruction cannot be rendered as written.
    #[error("malformed instruction '{symbol}': {cause}")]
    MalformedInstruction {
        /// Symbol of the offending instruction.
        symbol: Symbol,
        /// What is missing or inconsistent.
        cause: String,
    },

    /// Writing the program file failed.
    #[error("could not write QASM program: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
