//! Alsvid Hardware Abstraction Layer
//!
//! Configuration loading and the backend transport. An HPC system runs
//! a single control-stack instance per QPU; user programs reach it
//! through the [`Backend`] trait, implemented over mutually
//! authenticated HTTPS by [`HttpBackend`].
//!
//! The compilation core is synchronous: backend calls block, are never
//! retried or cancelled by the core, and surface their errors to the
//! owner of the calling scope.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{Backend, HttpBackend, QpuStatus};
pub use config::{NetworkSection, QpuConfig, QpuSection};
pub use error::{HalError, HalResult};
