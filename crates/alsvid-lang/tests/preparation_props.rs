//! Property-based tests for the Möttönen preparation block.
//!
//! For any amplitude vector with nonzero norm, the emitted block must
//! use only {Ry, Rz, CX}, stay inside the register, and respect the
//! O(2^n) gate bound of the UCR recursion.

use num_complex::Complex64;
use proptest::prelude::*;

use alsvid_ir::{Isa, QubitId, Symbol};
use alsvid_lang::{Endianness, prepare_state};

/// Generate a register size and an amplitude vector of matching
/// dimension with at least one clearly nonzero entry.
fn arb_sized_state() -> impl Strategy<Value = (usize, Vec<Complex64>)> {
    (1usize..=4).prop_flat_map(|n| {
        let dim = 1usize << n;
        let amplitudes = prop::collection::vec((-1.0..1.0f64, -1.0..1.0f64), dim..=dim)
            .prop_filter("state must have nonzero norm", |entries| {
                entries.iter().map(|(re, im)| re * re + im * im).sum::<f64>() > 1e-6
            })
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .map(|(re, im)| Complex64::new(re, im))
                    .collect::<Vec<_>>()
            });
        (Just(n), amplitudes)
    })
}

/// Worst-case gate count of the recursion: each level k emits at most
/// 3·2^k − 2 gates per rotation axis, so the whole preparation stays
/// under 6·2^n.
fn gate_bound(n: usize) -> usize {
    6 * (1 << n)
}

proptest! {
    #[test]
    fn prepare_state_uses_allowed_alphabet((n, state) in arb_sized_state()) {
        let isa = Isa::new("props");
        let targets: Vec<QubitId> = (0..n).map(QubitId::from).collect();
        let block = prepare_state(&isa, &targets, &state, Endianness::Little).unwrap();

        for instr in &block {
            prop_assert!(
                matches!(instr.symbol, Symbol::Ry | Symbol::Rz | Symbol::Cx),
                "unexpected symbol {}",
                instr.symbol
            );
        }
        prop_assert!(block.len() <= gate_bound(n));
    }

    #[test]
    fn prepare_state_stays_inside_register((n, state) in arb_sized_state()) {
        let isa = Isa::new("props");
        let targets: Vec<QubitId> = (0..n).map(QubitId::from).collect();
        let block = prepare_state(&isa, &targets, &state, Endianness::Little).unwrap();

        for instr in &block {
            for q in instr.target_qubits.iter().chain(instr.control_qubits.iter()) {
                prop_assert!(targets.contains(q));
            }
        }
    }

    #[test]
    fn endianness_reverses_target_roles(theta in 0.1..1.4f64) {
        // cos·|00⟩ + sin·|10⟩ keeps one register end trivial, so the
        // nontrivial rotation must land on opposite ends under the two
        // conventions.
        let state = vec![
            Complex64::new(theta.cos(), 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(theta.sin(), 0.0),
            Complex64::new(0.0, 0.0),
        ];
        let isa = Isa::new("props");
        let targets = [QubitId(0), QubitId(1)];

        let little = prepare_state(&isa, &targets, &state, Endianness::Little).unwrap();
        let big = prepare_state(&isa, &targets, &state, Endianness::Big).unwrap();

        let little_targets: Vec<QubitId> =
            little.iter().flat_map(|i| i.target_qubits.clone()).collect();
        let big_targets: Vec<QubitId> =
            big.iter().flat_map(|i| i.target_qubits.clone()).collect();
        prop_assert!(little_targets.contains(&QubitId(1)));
        prop_assert!(big_targets.contains(&QubitId(0)));
    }
}
