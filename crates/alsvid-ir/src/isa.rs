//! The instruction set architecture surface.
//!
//! The [`Isa`] factory is the only sanctioned way for user code to
//! produce instructions. Each builder checks the symbol's descriptor
//! (class and parameter count) before constructing, so the factory
//! never emits a value that would fail the well-formedness rules for
//! structural reasons.

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, Kind};
use crate::qubit::QubitId;
use crate::symbol::{Symbol, SymbolClass};

/// The instruction set architecture: every operation the hardware
/// accepts from user programs, keyed by symbol and built through a
/// descriptor-checked builder.
#[derive(Debug, Clone)]
pub struct Isa {
    name: String,
}

impl Isa {
    /// Create a named ISA handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of this ISA.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a fixed single-qubit gate (x, y, z, h, s, sdg, t, tdg).
    pub fn single(&self, symbol: Symbol, target: impl Into<QubitId>) -> IrResult<Instruction> {
        self.expect_class(symbol, SymbolClass::SingleFixed)?;
        Ok(Instruction::single(symbol, target.into()))
    }

    /// Build a parametric single-qubit gate (p, rx, ry, rz, phase, u2, u3).
    pub fn single_param(
        &self,
        symbol: Symbol,
        target: impl Into<QubitId>,
        params: Vec<f64>,
    ) -> IrResult<Instruction> {
        self.expect_class(symbol, SymbolClass::SingleParam)?;
        self.expect_params(symbol, &params)?;
        Ok(Instruction::single(symbol, target.into()).with_params(params))
    }

    /// Build a fixed controlled gate (cx, cy, cz, ch).
    pub fn controlled(
        &self,
        symbol: Symbol,
        control: impl Into<QubitId>,
        target: impl Into<QubitId>,
    ) -> IrResult<Instruction> {
        self.expect_class(symbol, SymbolClass::ControlledFixed)?;
        Ok(Instruction::controlled(symbol, control.into(), target.into()))
    }

    /// Build a parametric controlled gate (cp, crx, cry, crz, cphase, cu).
    pub fn controlled_param(
        &self,
        symbol: Symbol,
        control: impl Into<QubitId>,
        target: impl Into<QubitId>,
        params: Vec<f64>,
    ) -> IrResult<Instruction> {
        self.expect_class(symbol, SymbolClass::ControlledParam)?;
        self.expect_params(symbol, &params)?;
        Ok(Instruction::controlled(symbol, control.into(), target.into()).with_params(params))
    }

    /// Build a hardware characterization primitive.
    ///
    /// Test instructions carry their shot count from construction and
    /// are typed [`Kind::Test`] immediately.
    pub fn test(
        &self,
        symbol: Symbol,
        targets: Vec<QubitId>,
        params: Option<Vec<f64>>,
        shots: u32,
    ) -> IrResult<Instruction> {
        self.expect_class(symbol, SymbolClass::Test)?;
        let mut instr = Instruction::new(symbol, targets, vec![]).with_shots(shots);
        instr.params = params;
        instr.kind = Kind::Test;
        Ok(instr)
    }

    /// Build a SWAP.
    ///
    /// SWAP is symmetric by convention but stored with `a` in controls
    /// and `b` in targets to keep the two-operand contract uniform
    /// across routing.
    pub fn swap(&self, a: impl Into<QubitId>, b: impl Into<QubitId>) -> Instruction {
        let mut instr = Instruction::new(Symbol::Swap, vec![b.into()], vec![a.into()]);
        instr.is_controlled = false;
        instr
    }

    /// Build a NOP over the given targets.
    ///
    /// NOPs are fungible: they stay delayed so any context accepts them.
    pub fn nop(&self, targets: Vec<QubitId>) -> Instruction {
        Instruction::new(Symbol::Nop, targets, vec![])
    }

    /// Measure one or more qubits. Measurement modifies the state and
    /// is only meaningful inside a circuit, so it is typed directly.
    pub fn measure(&self, targets: Vec<QubitId>) -> Instruction {
        let mut instr = Instruction::new(Symbol::Measure, targets, vec![]).modifying();
        instr.kind = Kind::Circuit;
        instr
    }

    /// Reset one or more qubits. Resets are meaningful both inside and
    /// outside circuits, so they stay delayed.
    pub fn reset(&self, targets: Vec<QubitId>) -> Instruction {
        Instruction::new(Symbol::Reset, targets, vec![]).modifying()
    }

    /// Change the fidelity tolerance the backend applies when deciding
    /// whether the available qubits still form a functional QPU.
    pub fn ftol(&self, threshold: f64) -> Instruction {
        let mut instr = Instruction::new(Symbol::Ftol, vec![], vec![])
            .with_params(vec![threshold])
            .modifying();
        instr.kind = Kind::QpuState;
        instr
    }

    fn expect_class(&self, symbol: Symbol, class: SymbolClass) -> IrResult<()> {
        let descriptor = symbol.descriptor();
        if descriptor.class != class {
            return Err(IrError::MalformedInstruction {
                symbol,
                cause: format!("symbol does not admit builder class {class:?}"),
            });
        }
        Ok(())
    }

    fn expect_params(&self, symbol: Symbol, params: &[f64]) -> IrResult<()> {
        let expected = symbol.descriptor().param_count;
        if params.len() != expected {
            return Err(IrError::MalformedInstruction {
                symbol,
                cause: format!("expected {expected} parameters, got {}", params.len()),
            });
        }
        Ok(())
    }
}
