//! State preparation blocks.
//!
//! Three entry points, each returning an instruction block ready to be
//! appended to a circuit scope:
//!
//! - [`prepare_basis`] — a computational basis state in the Z, X, or Y
//!   basis;
//! - [`prepare_uniform`] — a uniform superposition over a subset of the
//!   targets;
//! - [`prepare_state`] — an arbitrary normalized amplitude vector via
//!   the Möttönen disentangling decomposition.

use num_complex::Complex64;

use alsvid_ir::{Instruction, Isa, QubitId, Symbol};

use crate::error::{LangError, LangResult};

/// Amplitudes below this are treated as zero.
const EPS: f64 = 1e-15;

/// Measurement basis for basis-state preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Basis {
    /// Computational basis |0⟩/|1⟩.
    #[default]
    Z,
    /// Hadamard basis |+⟩/|−⟩.
    X,
    /// Circular basis |+i⟩/|−i⟩.
    Y,
}

/// Bit-order convention for bitstrings and amplitude vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Index 0 of the bitstring addresses target 0.
    #[default]
    Little,
    /// Index 0 of the bitstring addresses the last target.
    Big,
}

/// Prepare a computational basis state.
///
/// Flips each target whose bit is '1', then rotates every target into
/// the requested basis: H for X, H followed by S for Y.
pub fn prepare_basis(
    isa: &Isa,
    targets: &[QubitId],
    bitstring: &str,
    basis: Basis,
    endianness: Endianness,
) -> LangResult<Vec<Instruction>> {
    if bitstring.len() != targets.len() {
        return Err(LangError::BitstringLength {
            expected: targets.len(),
            got: bitstring.len(),
        });
    }
    if !bitstring.chars().all(|c| c == '0' || c == '1') {
        return Err(LangError::BadBitstring(bitstring.to_string()));
    }

    let mut bits: Vec<char> = bitstring.chars().collect();
    if endianness == Endianness::Big {
        bits.reverse();
    }

    let mut instructions = Vec::new();
    for (i, bit) in bits.iter().enumerate() {
        if *bit == '1' {
            instructions.push(isa.single(Symbol::X, targets[i])?);
        }
    }

    match basis {
        Basis::Z => {}
        Basis::X => {
            for &target in targets {
                instructions.push(isa.single(Symbol::H, target)?);
            }
        }
        Basis::Y => {
            for &target in targets {
                instructions.push(isa.single(Symbol::H, target)?);
                instructions.push(isa.single(Symbol::S, target)?);
            }
        }
    }

    Ok(instructions)
}

/// Prepare a uniform superposition over `qubits`, leaving the rest of
/// the targets in |0⟩. `None` superposes every target.
pub fn prepare_uniform(
    isa: &Isa,
    targets: &[QubitId],
    qubits: Option<&[QubitId]>,
) -> LangResult<Vec<Instruction>> {
    let chosen = qubits.unwrap_or(targets);
    let strays: Vec<QubitId> = chosen
        .iter()
        .copied()
        .filter(|q| !targets.contains(q))
        .collect();
    if !strays.is_empty() {
        return Err(LangError::NotASubset(strays));
    }

    chosen
        .iter()
        .map(|&q| Ok(isa.single(Symbol::H, q)?))
        .collect()
}

/// Prepare an arbitrary state |ψ⟩ on the targets.
///
/// Möttönen et al.: compute the uniformly controlled Ry/Rz rotations
/// that disentangle |ψ⟩ down to |0…0⟩ one qubit at a time, then emit
/// the circuit in reverse so it builds the state from |0…0⟩.
pub fn prepare_state(
    isa: &Isa,
    targets: &[QubitId],
    state: &[Complex64],
    endianness: Endianness,
) -> LangResult<Vec<Instruction>> {
    let n = targets.len();
    let dim = 1usize << n;
    if state.len() != dim {
        return Err(LangError::StateLength {
            qubits: n,
            expected: dim,
            got: state.len(),
        });
    }

    let norm = state.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if norm < EPS {
        return Err(LangError::ZeroNormState);
    }
    let mut omega: Vec<Complex64> = state.iter().map(|a| a / norm).collect();

    let targets: Vec<QubitId> = match endianness {
        Endianness::Little => targets.to_vec(),
        Endianness::Big => targets.iter().rev().copied().collect(),
    };

    // Phase 1: disentangle from the last qubit down. At level k the
    // active entries are 0 .. 2^{k+1}-1 with all higher bits zeroed;
    // pairing entries that differ only in bit k yields the Ry/Rz
    // angles that zero the bit-k=1 partner.
    let mut levels = Vec::with_capacity(n);
    for k in (0..n).rev() {
        let half = 1usize << k;
        let mut ry_angles = Vec::with_capacity(half);
        let mut rz_angles = Vec::with_capacity(half);

        for c in 0..half {
            let (a0, a1) = (omega[c], omega[c + half]);
            let (r0, r1) = (a0.norm(), a1.norm());
            let r = (r0 * r0 + r1 * r1).sqrt();

            let theta = if r > EPS { 2.0 * r1.atan2(r0) } else { 0.0 };
            let phi = if r0 > EPS && r1 > EPS {
                a1.arg() - a0.arg()
            } else {
                0.0
            };
            ry_angles.push(theta);
            rz_angles.push(phi);

            // Disentangling maps (a0, a1) → (r·e^{i(arg a0 + arg a1)/2}, 0).
            if r > EPS {
                let gamma = (a0.arg() + a1.arg()) / 2.0;
                omega[c] = Complex64::from_polar(r, gamma);
                omega[c + half] = Complex64::new(0.0, 0.0);
            }
        }

        levels.push((k, ry_angles, rz_angles));
    }

    // Phase 2: emit the preparation, which is the disentangling walk
    // reversed. Ry comes first in time order at each level.
    let mut instructions = Vec::new();
    for (k, ry_angles, rz_angles) in levels.into_iter().rev() {
        let controls = &targets[..k];
        let target = targets[k];

        instructions.extend(ucr(isa, Symbol::Ry, target, controls, &ry_angles)?);
        if rz_angles.iter().any(|a| a.abs() > EPS) {
            instructions.extend(ucr(isa, Symbol::Rz, target, controls, &rz_angles)?);
        }
    }

    Ok(instructions)
}

/// Uniformly controlled rotation via the recursive multiplexor
/// identity:
///
/// ```text
/// UCR(θ₀..θ_{2^k−1}) = UCR(α) · CX(last ctrl, tgt) · UCR(β) · CX
///   α_j = (θ_j + θ_{j+half}) / 2,   β_j = (θ_j − θ_{j+half}) / 2
/// ```
fn ucr(
    isa: &Isa,
    gate: Symbol,
    target: QubitId,
    controls: &[QubitId],
    angles: &[f64],
) -> LangResult<Vec<Instruction>> {
    if angles.iter().all(|a| a.abs() < EPS) {
        return Ok(vec![]);
    }

    if controls.is_empty() {
        return Ok(vec![isa.single_param(gate, target, vec![angles[0]])?]);
    }

    let half = angles.len() / 2;
    let alpha: Vec<f64> = (0..half).map(|j| (angles[j] + angles[j + half]) / 2.0).collect();
    let beta: Vec<f64> = (0..half).map(|j| (angles[j] - angles[j + half]) / 2.0).collect();
    let inner = &controls[..controls.len() - 1];
    let last = controls[controls.len() - 1];

    let mut result = ucr(isa, gate, target, inner, &alpha)?;
    result.push(isa.controlled(Symbol::Cx, last, target)?);
    result.extend(ucr(isa, gate, target, inner, &beta)?);
    result.push(isa.controlled(Symbol::Cx, last, target)?);
    Ok(result)
}
