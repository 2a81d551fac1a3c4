//! Alsvid User Surface
//!
//! The programming model for a √iSWAP superconducting QPU: open a
//! handle from configuration, collect instructions inside a scoped
//! context, and let the scope close drive the compilation pipeline
//! (and, when configured, the backend).
//!
//! # Example
//!
//! ```no_run
//! use alsvid_lang::{ClassicalRegister, Qpu};
//! use alsvid_ir::{QubitId, Symbol};
//!
//! fn main() -> Result<(), alsvid_lang::LangError> {
//!     let qpu = Qpu::from_config_file("config/default.toml", Some("transpiled"))?;
//!     let isa = qpu.isa();
//!     let mut creg = ClassicalRegister::new(2);
//!
//!     qpu.circuit(&mut creg, 1000, |c| {
//!         c.add(isa.single(Symbol::H, 0u32)?)?;
//!         c.add(isa.controlled(Symbol::Cx, 0u32, 1u32)?)?;
//!         c.add(isa.measure(vec![QubitId(0), QubitId(1)]))?;
//!         Ok(())
//!     })?;
//!
//!     println!("{:?}", creg.frequencies()?);
//!     Ok(())
//! }
//! ```
//!
//! Test blocks work the same way with [`Qpu::test`], dispatching each
//! collected instruction individually to the backend; `ftol` and other
//! QPU state controls go through [`Qpu::control`] with no context at
//! all.

pub mod context;
pub mod error;
pub mod prepare;
pub mod qpu;
pub mod register;

pub use context::{CircuitScope, TestScope};
pub use error::{LangError, LangResult};
pub use prepare::{Basis, Endianness, prepare_basis, prepare_state, prepare_uniform};
pub use qpu::Qpu;
pub use register::ClassicalRegister;
