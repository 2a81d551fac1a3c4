//! Error types for the IR crate.

use crate::symbol::Symbol;
use thiserror::Error;

/// Errors raised while building or validating instructions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An instruction violates a well-formedness rule.
    #[error("malformed instruction '{symbol}': {cause}")]
    MalformedInstruction {
        /// Symbol of the offending instruction.
        symbol: Symbol,
        /// Which rule was violated.
        cause: String,
    },

    /// An instruction kind is incompatible with the enclosing context.
    #[error("context '{context}' prevents instruction '{symbol}'")]
    NotAllowedInContext {
        /// Symbol of the offending instruction.
        symbol: Symbol,
        /// Name of the rejecting context.
        context: String,
    },

    /// A symbol reached a dispatch table that does not cover it.
    ///
    /// Kept as a distinct kind so that injected or misrouted symbols
    /// are detectable downstream.
    #[error("unrecognized instruction '{0}'")]
    UnknownInstruction(Symbol),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
