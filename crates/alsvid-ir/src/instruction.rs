//! High-level instructions and their validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;
use crate::symbol::Symbol;

/// The kind of an instruction.
///
/// New instructions are [`Kind::Delayed`]: their use is determined by
/// the context that eventually challenges them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Use decided by a future context.
    Delayed,
    /// Part of a circuit program.
    Circuit,
    /// A hardware characterization dispatch.
    Test,
    /// Modulates QPU state outside any context.
    QpuState,
}

/// A Hoare-triple witness carried with an instruction.
///
/// The core never evaluates witnesses; they cross to the backend,
/// which owns the predicate language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Short witness name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Predicate text in the backend's condition language.
    pub predicate: String,
}

/// A mnemonic entity with executable consequences on hardware attached
/// to a QPU. Some instructions have no direct executable effect and
/// instead modulate the execution of others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Symbol from the recognized ISA set.
    pub symbol: Symbol,
    /// Kind, assigned by a context at challenge time.
    pub kind: Kind,
    /// Ordered target qubits. Empty only for QPU state instructions.
    pub target_qubits: Vec<QubitId>,
    /// Ordered control qubits. Non-empty iff `is_controlled`.
    pub control_qubits: Vec<QubitId>,
    /// Whether the instruction is controlled.
    pub is_controlled: bool,
    /// Whether execution collapses or clears quantum state.
    pub modifies_state: bool,
    /// Rotation angles in radians, or other real parameters.
    pub params: Option<Vec<f64>>,
    /// Shot count; only meaningful outside a circuit context.
    pub shots: Option<u32>,
    /// True once virtual indices have been substituted for physical ones.
    pub is_mapped: bool,
    /// Preconditions, forwarded to the backend unevaluated.
    pub pre: Vec<Witness>,
    /// Postconditions, forwarded to the backend unevaluated.
    pub post: Vec<Witness>,
}

impl Instruction {
    /// Create a delayed instruction with the given operands.
    pub fn new(
        symbol: Symbol,
        target_qubits: Vec<QubitId>,
        control_qubits: Vec<QubitId>,
    ) -> Self {
        let is_controlled = !control_qubits.is_empty();
        Self {
            symbol,
            kind: Kind::Delayed,
            target_qubits,
            control_qubits,
            is_controlled,
            modifies_state: false,
            params: None,
            shots: None,
            is_mapped: false,
            pre: vec![],
            post: vec![],
        }
    }

    /// Create a single-qubit instruction.
    pub fn single(symbol: Symbol, target: QubitId) -> Self {
        Self::new(symbol, vec![target], vec![])
    }

    /// Create a controlled two-qubit instruction.
    pub fn controlled(symbol: Symbol, control: QubitId, target: QubitId) -> Self {
        Self::new(symbol, vec![target], vec![control])
    }

    /// Attach parameters.
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach a shot count (for use outside circuit contexts).
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Mark as state-modifying (measure, reset, state control).
    pub fn modifying(mut self) -> Self {
        self.modifies_state = true;
        self
    }

    /// Add a precondition witness.
    pub fn add_precondition(&mut self, witness: Witness) {
        self.pre.push(witness);
    }

    /// Add a postcondition witness.
    pub fn add_postcondition(&mut self, witness: Witness) {
        self.post.push(witness);
    }

    /// Total number of qubit operands.
    pub fn operand_count(&self) -> usize {
        self.target_qubits.len() + self.control_qubits.len()
    }

    /// Whether this instruction touches exactly two qubits.
    pub fn is_two_qubit(&self) -> bool {
        self.operand_count() == 2
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} over {:?} controlled by {:?}",
            self.symbol, self.target_qubits, self.control_qubits
        )
    }
}

/// Constraint set a context imposes on the instructions appended to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// An atomic circuit program.
    Circuit,
    /// A hardware characterization block.
    Test,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Circuit => f.write_str("circuit"),
            Context::Test => f.write_str("test"),
        }
    }
}

/// Validate an instruction and bind it to a context.
///
/// Checks static well-formedness, then applies the context rules on a
/// copy — the caller's instruction is never touched:
///
/// - `Some(Circuit)`: rejects test and QPU-state kinds, assigns
///   [`Kind::Circuit`], clears shots (a circuit runs as a whole).
/// - `Some(Test)`: rejects QPU-state kinds, requires shots, assigns
///   [`Kind::Test`].
/// - `None`: assigns [`Kind::QpuState`].
pub fn challenge(instruction: &Instruction, context: Option<Context>) -> IrResult<Instruction> {
    well_formed(instruction)?;

    let mut instr = instruction.clone();

    match context {
        Some(Context::Circuit) => {
            if matches!(instruction.kind, Kind::QpuState | Kind::Test) {
                return Err(IrError::NotAllowedInContext {
                    symbol: instruction.symbol,
                    context: Context::Circuit.to_string(),
                });
            }
            instr.kind = Kind::Circuit;
            instr.shots = None;
        }
        Some(Context::Test) => {
            if instruction.kind == Kind::QpuState {
                return Err(IrError::NotAllowedInContext {
                    symbol: instruction.symbol,
                    context: Context::Test.to_string(),
                });
            }
            if instruction.shots.is_none() {
                return Err(malformed(instruction, "tests must indicate number of shots"));
            }
            // A gate challenged as a test executes alone and returns a
            // measurement automatically.
            instr.kind = Kind::Test;
        }
        None => {
            instr.kind = Kind::QpuState;
        }
    }

    Ok(instr)
}

/// Check the static well-formedness rules.
fn well_formed(instruction: &Instruction) -> IrResult<()> {
    if instruction.target_qubits.is_empty() && instruction.kind != Kind::QpuState {
        return Err(malformed(instruction, "target qubits must be non-empty"));
    }

    if instruction.is_controlled && instruction.control_qubits.is_empty() {
        return Err(malformed(
            instruction,
            "control qubits must be present if controlled",
        ));
    }

    // Covers the swap convention too, which rides one operand in the
    // control slot without being controlled.
    if instruction
        .control_qubits
        .iter()
        .any(|c| instruction.target_qubits.contains(c))
    {
        return Err(malformed(
            instruction,
            "target and control qubits must be different",
        ));
    }

    if let Some(params) = &instruction.params {
        if params.iter().any(|p| !p.is_finite()) {
            return Err(malformed(instruction, "all parameters must be real values"));
        }
    }

    if let Some(shots) = instruction.shots {
        if shots == 0 {
            return Err(malformed(instruction, "shot count must be positive"));
        }
    }

    if instruction.kind == Kind::Test && instruction.shots.is_none() {
        return Err(malformed(instruction, "tests must indicate number of shots"));
    }

    Ok(())
}

fn malformed(instruction: &Instruction, cause: &str) -> IrError {
    IrError::MalformedInstruction {
        symbol: instruction.symbol,
        cause: cause.to_string(),
    }
}
