//! OpenQASM 3.0 emission for Alsvid.
//!
//! Deterministic textual export of a challenged circuit's high-level
//! instruction list. Emission happens before native lowering, so the
//! output speaks the portable OpenQASM gate vocabulary, not the
//! device alphabet.
//!
//! ```
//! use alsvid_ir::{Isa, Symbol};
//! use alsvid_qasm3::emit;
//!
//! let isa = Isa::new("alsvid");
//! let program = vec![
//!     isa.single(Symbol::H, 0u32).unwrap(),
//!     isa.controlled(Symbol::Cx, 0u32, 1u32).unwrap(),
//! ];
//! let text = emit(&program, 2, 2).unwrap();
//! assert!(text.starts_with("OPENQASM 3.0;"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{emit, emit_instruction, emit_to_file};
pub use error::{EmitError, EmitResult};
