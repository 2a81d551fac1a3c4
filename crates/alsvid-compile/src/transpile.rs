//! Native transpilation for {Rx, Ry, √iSWAP} devices.
//!
//! Lowering is table-driven: each high-level symbol maps to a fixed
//! sequence of native gates, each entry naming the native symbol, a
//! parameter override (or inheritance from the instruction), and a
//! route tag selecting which operands of the instruction the emitted
//! gate acts on. The sequences and parameter signs are the hardware
//! contract; do not reorder them.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use alsvid_ir::{Gate, Instruction, IrError, QubitId, Symbol};
use tracing::debug;

use crate::error::CompileResult;

/// Operand routing of one native gate within a sequence.
///
/// | tag  | emitted gate operands (targets, controls)  |
/// |------|--------------------------------------------|
/// | `.`  | (instr.targets, none) — single-qubit       |
/// | `t`  | (instr.targets, none) — acts on target     |
/// | `c`  | (instr.controls, none) — acts on control   |
/// | `*`  | (instr.targets, instr.controls)            |
/// | `+`  | (instr.controls, instr.targets) — reversed |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `.` — single-qubit gate on the instruction targets.
    Single,
    /// `t` — acts on the target operand of a two-qubit instruction.
    Target,
    /// `c` — acts on the control operand.
    Control,
    /// `*` — two-qubit entangler, (targets, controls).
    Pair,
    /// `+` — two-qubit entangler with operands reversed.
    Reversed,
}

/// One row of a lowering sequence. `params: None` inherits the
/// instruction's own parameters.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    symbol: Symbol,
    params: Option<&'static [f64]>,
    route: Route,
}

const fn row(symbol: Symbol, params: Option<&'static [f64]>, route: Route) -> Entry {
    Entry {
        symbol,
        params,
        route,
    }
}

const NOP: &[Entry] = &[row(Symbol::Nop, Some(&[]), Route::Single)];

const X: &[Entry] = &[row(Symbol::Rx, Some(&[PI]), Route::Single)];

const Y: &[Entry] = &[row(Symbol::Ry, Some(&[PI]), Route::Single)];

const Z: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[PI]), Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

const H: &[Entry] = &[
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[PI]), Route::Single),
];

const S: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[FRAC_PI_2]), Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

const SDG: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

const T: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[FRAC_PI_4]), Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

const TDG: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, Some(&[-FRAC_PI_4]), Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

const RX: &[Entry] = &[row(Symbol::Rx, None, Route::Single)];

const RY: &[Entry] = &[row(Symbol::Ry, None, Route::Single)];

/// rz, p, and phase share the same Ry-conjugated Rx rendition.
const RZ_LIKE: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Single),
    row(Symbol::Rx, None, Route::Single),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Single),
];

/// Compiled directly through √iSWAPs to avoid the six extra gates of
/// the usual intermediate CNOTs. Other renditions may follow; see
/// https://arxiv.org/html/2412.15022v1
const SWAP: &[Entry] = &[
    row(Symbol::Rx, Some(&[FRAC_PI_2]), Route::Control),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[FRAC_PI_2]), Route::Control),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
];

const CX: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
];

const CY: &[Entry] = &[
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, Some(&[FRAC_PI_2]), Route::Target),
];

const CZ: &[Entry] = &[
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, Some(&[PI]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, Some(&[PI]), Route::Target),
];

const CH: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
];

/// cp and cphase share one sequence.
const CP_LIKE: &[Entry] = &[
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, None, Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
];

const CRX: &[Entry] = &[
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, None, Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
];

const CRY: &[Entry] = &[
    row(Symbol::Rx, Some(&[PI]), Route::Target),
    row(Symbol::Ry, None, Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, None, Route::Target),
    row(Symbol::Rx, Some(&[PI]), Route::Target),
];

const CRZ: &[Entry] = &[
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Rx, None, Route::Target),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
    row(Symbol::Ry, Some(&[-FRAC_PI_2]), Route::Target),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Rx, Some(&[-FRAC_PI_2]), Route::Control),
    row(Symbol::Sqiswap, Some(&[]), Route::Pair),
    row(Symbol::Ry, Some(&[FRAC_PI_2]), Route::Target),
];

/// Lowering sequence for a high-level symbol, when the table covers it.
///
/// `u2`, `u3`, and `cu` are deliberately absent: they must be expanded
/// at the instruction level before transpilation.
fn sequence(symbol: Symbol) -> Option<&'static [Entry]> {
    Some(match symbol {
        Symbol::Nop => NOP,
        Symbol::X => X,
        Symbol::Y => Y,
        Symbol::Z => Z,
        Symbol::H => H,
        Symbol::S => S,
        Symbol::Sdg => SDG,
        Symbol::T => T,
        Symbol::Tdg => TDG,
        Symbol::P | Symbol::Rz | Symbol::Phase => RZ_LIKE,
        Symbol::Rx => RX,
        Symbol::Ry => RY,
        Symbol::Swap => SWAP,
        Symbol::Cx => CX,
        Symbol::Cy => CY,
        Symbol::Cz => CZ,
        Symbol::Ch => CH,
        Symbol::Cp | Symbol::Cphase => CP_LIKE,
        Symbol::Crx => CRX,
        Symbol::Cry => CRY,
        Symbol::Crz => CRZ,
        _ => return None,
    })
}

/// Transpiler for hardware whose native alphabet is
/// {Rx(θ), Ry(θ), √iSWAP} plus measure, reset, and nop.
#[derive(Debug, Clone, Default)]
pub struct XyIsw;

impl XyIsw {
    /// Create the transpiler.
    pub fn new() -> Self {
        Self
    }

    /// Lower one instruction into its native gate sequence.
    ///
    /// Operates on already mapped (and swapped) qubits and preserves
    /// sequence order. Symbols outside the table raise
    /// [`IrError::UnknownInstruction`] so that nothing unrecognized can
    /// ride a compiled program to the device.
    pub fn transpile_gate(&self, instruction: &Instruction) -> CompileResult<Vec<Gate>> {
        match instruction.symbol {
            // Native non-unitary alphabet passes straight through.
            Symbol::Measure | Symbol::Reset => Ok(vec![Gate::new(
                instruction.symbol,
                instruction.target_qubits.clone(),
                None,
                None,
            )]),
            symbol => {
                let rows = sequence(symbol)
                    .ok_or(IrError::UnknownInstruction(symbol))?;
                let gates = rows
                    .iter()
                    .map(|entry| synthesize(instruction, entry))
                    .collect();
                debug!(symbol = %symbol, gates = rows.len(), "transpiled");
                Ok(gates)
            }
        }
    }
}

/// Complete one table row into a gate using the instruction's operands.
fn synthesize(instruction: &Instruction, entry: &Entry) -> Gate {
    let (targets, controls): (Vec<QubitId>, Option<Vec<QubitId>>) = match entry.route {
        Route::Single | Route::Target => (instruction.target_qubits.clone(), None),
        Route::Control => (instruction.control_qubits.clone(), None),
        Route::Pair => (
            instruction.target_qubits.clone(),
            Some(instruction.control_qubits.clone()),
        ),
        Route::Reversed => (
            instruction.control_qubits.clone(),
            Some(instruction.target_qubits.clone()),
        ),
    };
    let params = entry
        .params
        .map(<[f64]>::to_vec)
        .or_else(|| instruction.params.clone());
    Gate::new(entry.symbol, targets, controls, params)
}

/// Pick the native gate set for a machine name.
///
/// Unrecognized names fall back to the default √iSWAP set.
pub fn native_set(machine: &str) -> XyIsw {
    match machine {
        "pfaff_v1" => XyIsw::new(),
        other => {
            debug!(machine = other, "no dedicated gate set, using default");
            XyIsw::new()
        }
    }
}
