//! The QPU handle.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use alsvid_compile::{Mapping, PassName, Pipeline, Program, Topology, XyIsw, native_set};
use alsvid_hal::{Backend, HalError, HttpBackend, QpuConfig};
use alsvid_ir::{Instruction, Isa, QubitId, challenge};

use crate::context::{CircuitScope, TestScope};
use crate::error::LangResult;
use crate::register::ClassicalRegister;

/// A handle to one QPU: configuration, topology, mapping, ISA, native
/// gate set, and (when executing) the backend connection.
///
/// All shared pieces are built once here and read-only afterwards, so
/// a handle can serve any number of sequentially opened contexts.
pub struct Qpu {
    config: QpuConfig,
    topology: Topology,
    mapping: Mapping,
    isa: Isa,
    transpiler: XyIsw,
    last_pass: String,
    backend: Option<Box<dyn Backend>>,
}

impl std::fmt::Debug for Qpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Qpu")
            .field("config", &self.config)
            .field("topology", &self.topology)
            .field("mapping", &self.mapping)
            .field("isa", &self.isa)
            .field("transpiler", &self.transpiler)
            .field("last_pass", &self.last_pass)
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

impl Qpu {
    /// Build a handle from a configuration file.
    ///
    /// `last_pass` selects the terminal compilation pass; omitted, it
    /// defaults to `transpiled`. The backend connection is established
    /// eagerly iff the terminal pass is `executed`, and a failure
    /// there surfaces now rather than at the first circuit close.
    pub fn from_config_file(
        path: impl AsRef<std::path::Path>,
        last_pass: Option<&str>,
    ) -> LangResult<Self> {
        let config = QpuConfig::from_file(path)?;
        Self::build(config, last_pass, None)
    }

    /// Build a handle from an already-parsed configuration.
    pub fn from_config(config: QpuConfig, last_pass: Option<&str>) -> LangResult<Self> {
        Self::build(config, last_pass, None)
    }

    /// Build a handle around a caller-supplied backend.
    pub fn with_backend(
        config: QpuConfig,
        last_pass: Option<&str>,
        backend: Box<dyn Backend>,
    ) -> LangResult<Self> {
        Self::build(config, last_pass, Some(backend))
    }

    fn build(
        config: QpuConfig,
        last_pass: Option<&str>,
        backend: Option<Box<dyn Backend>>,
    ) -> LangResult<Self> {
        let topology = Topology::new(
            &config.qpu.topology,
            &config.qpu.qubits,
            &config.qpu.couplings,
            &config.qpu.exclusions,
        )?;
        let mapping = Mapping::new(config.qpu.qubit_count, &topology)?;
        let transpiler = native_set(&config.qpu.name);
        let last_pass = last_pass.unwrap_or(PassName::DEFAULT.name()).to_string();

        let backend = match backend {
            Some(backend) => Some(backend),
            None if last_pass == PassName::Executed.name() => {
                Some(Box::new(HttpBackend::connect(&config)?) as Box<dyn Backend>)
            }
            None => None,
        };

        Ok(Self {
            config,
            topology,
            mapping,
            isa: Isa::new("alsvid"),
            transpiler,
            last_pass,
            backend,
        })
    }

    /// The instruction set architecture.
    pub fn isa(&self) -> &Isa {
        &self.isa
    }

    /// The loaded configuration.
    pub fn config(&self) -> &QpuConfig {
        &self.config
    }

    /// The filtered device topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The virtual-to-physical mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The configured terminal pass name.
    pub fn last_pass(&self) -> &str {
        &self.last_pass
    }

    /// All virtual qubit indices of this handle's register.
    pub fn all(&self) -> Vec<QubitId> {
        self.mapping.virtual_qubits()
    }

    /// The virtual register minus the given indices.
    pub fn but(&self, minus: &[QubitId]) -> Vec<QubitId> {
        self.mapping
            .virtual_qubits()
            .into_iter()
            .filter(|q| !minus.contains(q))
            .collect()
    }

    /// The compilation pipeline over this handle's collaborators.
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.topology, &self.mapping, &self.isa, &self.transpiler)
    }

    /// Open a circuit scope.
    ///
    /// The body collects instructions through [`CircuitScope::add`].
    /// If it returns an error, that error propagates unchanged and no
    /// pipeline runs. On clean return the pipeline runs to the
    /// configured terminal pass; `executed` hands the native gates to
    /// the backend, every earlier terminal pass leaves the register
    /// holding the −1 sentinel ensemble.
    pub fn circuit<F>(
        &self,
        creg: &mut ClassicalRegister,
        shots: u32,
        body: F,
    ) -> LangResult<()>
    where
        F: FnOnce(&mut CircuitScope) -> LangResult<()>,
    {
        let mut scope = CircuitScope::new();
        body(&mut scope)?;
        self.close_circuit(&scope, creg, shots)
    }

    fn close_circuit(
        &self,
        scope: &CircuitScope,
        creg: &mut ClassicalRegister,
        shots: u32,
    ) -> LangResult<()> {
        let (pass, program) = self
            .pipeline()
            .run(scope.instructions(), &self.last_pass)?;
        debug!(pass = %pass, shots, "circuit scope closed");

        match (pass, program) {
            (PassName::Executed, Program::Gates(gates)) => {
                let backend = self.backend.as_deref().ok_or(HalError::NotConnected)?;
                let counts = backend.exec_circuit(&gates, shots)?;
                creg.absorb(counts);
            }
            _ => creg.absorb(sentinel(creg.bit_count())),
        }
        Ok(())
    }

    /// Open a test scope.
    ///
    /// On clean return every collected instruction is dispatched
    /// individually to the backend's single-instruction endpoint, and
    /// its record lands in `accum` under the instruction's index.
    pub fn test<F>(&self, accum: &mut FxHashMap<usize, Value>, body: F) -> LangResult<()>
    where
        F: FnOnce(&mut TestScope) -> LangResult<()>,
    {
        let mut scope = TestScope::new();
        body(&mut scope)?;

        let backend = self.backend.as_deref().ok_or(HalError::NotConnected)?;
        for (index, instruction) in scope.instructions().iter().enumerate() {
            let shots = instruction.shots.unwrap_or(1);
            let record = backend.exec_single(instruction, shots)?;
            accum.insert(index, record);
        }
        debug!(dispatched = scope.instructions().len(), "test scope closed");
        Ok(())
    }

    /// Issue a QPU state control instruction outside any context.
    pub fn control(&self, instruction: &Instruction) -> LangResult<Value> {
        let challenged = challenge(instruction, None)?;
        let backend = self.backend.as_deref().ok_or(HalError::NotConnected)?;
        let shots = challenged.shots.unwrap_or(1);
        Ok(backend.exec_single(&challenged, shots)?)
    }
}

/// The ensemble a register absorbs when compilation stops before
/// execution: every outcome of the bit width, counted −1.
fn sentinel(bit_count: u32) -> FxHashMap<String, i64> {
    let width = bit_count as usize;
    (0..(1u64 << bit_count))
        .map(|i| (format!("{i:0width$b}"), -1))
        .collect()
}
