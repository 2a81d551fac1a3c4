//! Alsvid Compilation Passes
//!
//! This crate lowers high-level instruction programs to the native
//! alphabet of a √iSWAP superconducting QPU. The passes run in a fixed
//! order, and a program can stop at any named stage:
//!
//! ```text
//! parsed ──▶ mapped ──▶ swapped ──▶ expanded ──▶ transpiled ──▶ executed
//!            (F)        (E)         (G)          (H)            (backend)
//! ```
//!
//! - **Mapping**: substitute physical qubit indices for the virtual
//!   register ([`Mapping`]).
//! - **Routing**: insert SWAP sandwiches so every two-qubit gate acts
//!   on coupled qubits ([`Topology::swaps`]).
//! - **Expansion**: rewrite `u2`/`u3`/`cu` and split multi-qubit
//!   measurements ([`expand`]).
//! - **Transpilation**: table-driven lowering to
//!   {Rx, Ry, √iSWAP, measure, reset, nop} ([`XyIsw`]).
//!
//! The [`Pipeline`] ties the passes to their shared read-only
//! collaborators; the `executed` stage itself belongs to the context
//! crate, which owns the backend handle.

pub mod error;
pub mod expand;
pub mod mapping;
pub mod pipeline;
pub mod topology;
pub mod transpile;

pub use error::{CompileError, CompileResult};
pub use expand::expand;
pub use mapping::Mapping;
pub use pipeline::{PassName, Pipeline, Program};
pub use topology::{Topology, TopologyKind};
pub use transpile::{Route, XyIsw, native_set};
