//! High-level instruction expansion.
//!
//! The expander runs after mapping and routing and rewrites the
//! instructions the native table cannot take directly: the OpenQASM 2
//! legacy unitaries `u2`/`u3`, the controlled unitary `cu`, and
//! multi-qubit `measure`. Everything else passes through unchanged.

use std::f64::consts::FRAC_PI_2;

use alsvid_ir::{Instruction, IrError, Isa, Symbol};

use crate::error::{CompileError, CompileResult};

/// Expand one instruction into table-ready instructions.
pub fn expand(instruction: &Instruction, isa: &Isa) -> CompileResult<Vec<Instruction>> {
    match instruction.symbol {
        Symbol::U2 => {
            let [phi, lambda] = two_params(instruction)?;
            let target = target(instruction)?;
            adopt(
                instruction,
                vec![
                    isa.single_param(Symbol::Rz, target, vec![phi])?,
                    isa.single_param(Symbol::Ry, target, vec![FRAC_PI_2])?,
                    isa.single_param(Symbol::Rz, target, vec![lambda])?,
                ],
            )
        }
        Symbol::U3 => {
            let [phi, theta, lambda] = three_params(instruction)?;
            let target = target(instruction)?;
            adopt(
                instruction,
                vec![
                    isa.single_param(Symbol::Rz, target, vec![phi])?,
                    isa.single_param(Symbol::Ry, target, vec![theta])?,
                    isa.single_param(Symbol::Rz, target, vec![lambda])?,
                ],
            )
        }
        Symbol::Cu => {
            let [phi, theta, lambda] = three_params(instruction)?;
            let target = target(instruction)?;
            let control = *instruction.control_qubits.first().ok_or_else(|| {
                malformed(instruction, "cu requires a control qubit")
            })?;
            adopt(
                instruction,
                vec![
                    isa.single_param(Symbol::Rz, target, vec![lambda])?,
                    isa.single_param(Symbol::Ry, target, vec![theta / 2.0])?,
                    isa.controlled(Symbol::Cx, control, target)?,
                    isa.single_param(Symbol::Ry, target, vec![-theta / 2.0])?,
                    isa.single_param(Symbol::Rz, target, vec![-(phi + lambda)])?,
                    isa.controlled(Symbol::Cx, control, target)?,
                    isa.single_param(Symbol::Rz, target, vec![phi])?,
                ],
            )
        }
        Symbol::Measure if instruction.target_qubits.len() > 1 => {
            let split = instruction
                .target_qubits
                .iter()
                .map(|&q| isa.measure(vec![q]))
                .collect();
            adopt(instruction, split)
        }
        _ => Ok(vec![instruction.clone()]),
    }
}

/// Expansion products stand in for the instruction they came from, so
/// they carry its kind and mapping state.
fn adopt(
    instruction: &Instruction,
    mut products: Vec<Instruction>,
) -> CompileResult<Vec<Instruction>> {
    for product in &mut products {
        product.kind = instruction.kind;
        product.is_mapped = instruction.is_mapped;
    }
    Ok(products)
}

fn target(instruction: &Instruction) -> CompileResult<alsvid_ir::QubitId> {
    instruction
        .target_qubits
        .first()
        .copied()
        .ok_or_else(|| malformed(instruction, "expansion requires a target qubit"))
}

fn two_params(instruction: &Instruction) -> CompileResult<[f64; 2]> {
    match instruction.params.as_deref() {
        Some([a, b]) => Ok([*a, *b]),
        _ => Err(malformed(instruction, "expected exactly 2 parameters")),
    }
}

fn three_params(instruction: &Instruction) -> CompileResult<[f64; 3]> {
    match instruction.params.as_deref() {
        Some([a, b, c]) => Ok([*a, *b, *c]),
        _ => Err(malformed(instruction, "expected exactly 3 parameters")),
    }
}

fn malformed(instruction: &Instruction, cause: &str) -> CompileError {
    IrError::MalformedInstruction {
        symbol: instruction.symbol,
        cause: cause.to_string(),
    }
    .into()
}
