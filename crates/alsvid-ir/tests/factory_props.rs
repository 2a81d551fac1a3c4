//! Property-based tests for the ISA factory.
//!
//! Every builder, fed any well-formed argument set, must produce an
//! instruction that survives the challenge invariants.

use proptest::prelude::*;

use alsvid_ir::{Context, Instruction, Kind, QubitId, Symbol, challenge};

fn arb_single_fixed() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        Just(Symbol::X),
        Just(Symbol::Y),
        Just(Symbol::Z),
        Just(Symbol::H),
        Just(Symbol::S),
        Just(Symbol::Sdg),
        Just(Symbol::T),
        Just(Symbol::Tdg),
    ]
}

fn arb_rotation() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        Just(Symbol::P),
        Just(Symbol::Rx),
        Just(Symbol::Ry),
        Just(Symbol::Rz),
        Just(Symbol::Phase),
    ]
}

fn arb_controlled_fixed() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        Just(Symbol::Cx),
        Just(Symbol::Cy),
        Just(Symbol::Cz),
        Just(Symbol::Ch),
    ]
}

fn assert_well_formed(instruction: &Instruction) {
    // Challenging under the circuit context exercises the full
    // invariant set; gates coming out of the factory are all
    // circuit-legal.
    let challenged = challenge(instruction, Some(Context::Circuit)).unwrap();
    assert_eq!(challenged.kind, Kind::Circuit);
    assert_eq!(challenged.shots, None);
}

proptest! {
    #[test]
    fn single_fixed_builders_are_well_formed(
        symbol in arb_single_fixed(),
        target in 0u32..64,
    ) {
        let isa = alsvid_ir::Isa::new("props");
        let instr = isa.single(symbol, target).unwrap();
        prop_assert_eq!(instr.kind, Kind::Delayed);
        prop_assert_eq!(&instr.target_qubits, &vec![QubitId(target)]);
        assert_well_formed(&instr);
    }

    #[test]
    fn rotation_builders_are_well_formed(
        symbol in arb_rotation(),
        target in 0u32..64,
        angle in -10.0..10.0f64,
    ) {
        let isa = alsvid_ir::Isa::new("props");
        let instr = isa.single_param(symbol, target, vec![angle]).unwrap();
        prop_assert_eq!(instr.params.clone(), Some(vec![angle]));
        assert_well_formed(&instr);
    }

    #[test]
    fn controlled_builders_reject_overlap_and_accept_distinct(
        symbol in arb_controlled_fixed(),
        control in 0u32..64,
        target in 0u32..64,
    ) {
        let isa = alsvid_ir::Isa::new("props");
        let instr = isa.controlled(symbol, control, target).unwrap();
        prop_assert!(instr.is_controlled);

        let outcome = challenge(&instr, Some(Context::Circuit));
        if control == target {
            prop_assert!(outcome.is_err());
        } else {
            prop_assert!(outcome.is_ok());
        }
    }

    #[test]
    fn challenge_never_mutates_its_input(
        symbol in arb_single_fixed(),
        target in 0u32..64,
        shots in 1u32..10_000,
    ) {
        let isa = alsvid_ir::Isa::new("props");
        let original = isa.single(symbol, target).unwrap().with_shots(shots);
        let snapshot = original.clone();

        let circuit = challenge(&original, Some(Context::Circuit)).unwrap();
        let test = challenge(&original, Some(Context::Test)).unwrap();

        prop_assert_eq!(&original, &snapshot);
        prop_assert_eq!(circuit.shots, None);
        prop_assert_eq!(test.shots, Some(shots));
    }
}
