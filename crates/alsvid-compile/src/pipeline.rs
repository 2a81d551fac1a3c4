//! The ordered compilation pipeline.

use std::fmt;

use alsvid_ir::{Gate, Instruction, Isa};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::expand::expand;
use crate::mapping::Mapping;
use crate::topology::Topology;
use crate::transpile::XyIsw;

/// Names of the compilation passes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassName {
    /// Instructions as accepted by the context.
    Parsed,
    /// Virtual indices substituted for physical ones.
    Mapped,
    /// SWAP sandwiches inserted around non-local two-qubit gates.
    Swapped,
    /// High-level unitaries expanded, multi-measures split.
    Expanded,
    /// Native gates.
    Transpiled,
    /// Native gates, handed to the backend by the context.
    Executed,
}

impl PassName {
    /// Default terminal pass when the user does not pick one.
    pub const DEFAULT: PassName = PassName::Transpiled;

    /// Parse a configured pass name.
    ///
    /// The configuration string is only checked here, at run time, so
    /// an unknown name surfaces exactly when a pipeline run is asked
    /// to stop at it.
    pub fn parse(name: &str) -> CompileResult<Self> {
        match name {
            "parsed" => Ok(PassName::Parsed),
            "mapped" => Ok(PassName::Mapped),
            "swapped" => Ok(PassName::Swapped),
            "expanded" => Ok(PassName::Expanded),
            "transpiled" => Ok(PassName::Transpiled),
            "executed" => Ok(PassName::Executed),
            other => Err(CompileError::UnknownCompilerPass(other.to_string())),
        }
    }

    /// Configuration spelling of this pass.
    pub fn name(&self) -> &'static str {
        match self {
            PassName::Parsed => "parsed",
            PassName::Mapped => "mapped",
            PassName::Swapped => "swapped",
            PassName::Expanded => "expanded",
            PassName::Transpiled => "transpiled",
            PassName::Executed => "executed",
        }
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a pipeline run: the program at the terminal pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    /// Instruction-level stages (parsed, mapped, swapped, expanded).
    Instructions(Vec<Instruction>),
    /// Native stages (transpiled, executed).
    Gates(Vec<Gate>),
}

/// Ordered sequence of named passes over one circuit.
///
/// The pipeline owns direct references to its collaborators — the
/// forwarding chain of the hosting objects stops here. It runs the
/// passes in order and returns immediately after the terminal pass
/// the caller names.
pub struct Pipeline<'a> {
    topology: &'a Topology,
    mapping: &'a Mapping,
    isa: &'a Isa,
    transpiler: &'a XyIsw,
}

impl<'a> Pipeline<'a> {
    /// Assemble a pipeline over shared read-only collaborators.
    pub fn new(
        topology: &'a Topology,
        mapping: &'a Mapping,
        isa: &'a Isa,
        transpiler: &'a XyIsw,
    ) -> Self {
        Self {
            topology,
            mapping,
            isa,
            transpiler,
        }
    }

    /// Run the passes in order, stopping after `last_pass`.
    ///
    /// Passes may grow the program by insertion but never reorder the
    /// surviving instructions. `executed` compiles like `transpiled`;
    /// the backend call belongs to the context that owns the scope.
    pub fn run(
        &self,
        instructions: &[Instruction],
        last_pass: &str,
    ) -> CompileResult<(PassName, Program)> {
        let stop = PassName::parse(last_pass)?;

        let parsed = instructions.to_vec();
        debug!(pass = "parsed", count = parsed.len(), "pass complete");
        if stop == PassName::Parsed {
            return Ok((stop, Program::Instructions(parsed)));
        }

        let mapped = parsed
            .iter()
            .map(|instr| self.mapping.map(instr))
            .collect::<CompileResult<Vec<_>>>()?;
        debug!(pass = "mapped", count = mapped.len(), "pass complete");
        if stop == PassName::Mapped {
            return Ok((stop, Program::Instructions(mapped)));
        }

        let mut swapped = Vec::with_capacity(mapped.len());
        for instr in &mapped {
            swapped.extend(self.topology.swaps(instr, self.isa)?);
        }
        debug!(pass = "swapped", count = swapped.len(), "pass complete");
        if stop == PassName::Swapped {
            return Ok((stop, Program::Instructions(swapped)));
        }

        let mut expanded = Vec::with_capacity(swapped.len());
        for instr in &swapped {
            expanded.extend(expand(instr, self.isa)?);
        }
        debug!(pass = "expanded", count = expanded.len(), "pass complete");
        if stop == PassName::Expanded {
            return Ok((stop, Program::Instructions(expanded)));
        }

        let mut transpiled = Vec::with_capacity(expanded.len());
        for instr in &expanded {
            transpiled.extend(self.transpiler.transpile_gate(instr)?);
        }
        debug!(pass = "transpiled", count = transpiled.len(), "pass complete");

        Ok((stop, Program::Gates(transpiled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{QubitId, Symbol};

    struct Fixture {
        topology: Topology,
        mapping: Mapping,
        isa: Isa,
        transpiler: XyIsw,
    }

    impl Fixture {
        fn linear(qubits: u32) -> Self {
            let indices: Vec<u32> = (0..qubits).collect();
            let couplings: Vec<(u32, u32)> = (0..qubits - 1).map(|i| (i, i + 1)).collect();
            let topology = Topology::new("linear", &indices, &couplings, &[]).unwrap();
            let mapping = Mapping::new(qubits, &topology).unwrap();
            Self {
                topology,
                mapping,
                isa: Isa::new("test"),
                transpiler: XyIsw::new(),
            }
        }

        fn pipeline(&self) -> Pipeline<'_> {
            Pipeline::new(&self.topology, &self.mapping, &self.isa, &self.transpiler)
        }
    }

    #[test]
    fn test_unknown_pass_raised_at_run() {
        let fixture = Fixture::linear(2);
        let err = fixture.pipeline().run(&[], "bogus_pass").unwrap_err();
        assert!(matches!(err, CompileError::UnknownCompilerPass(_)));
    }

    #[test]
    fn test_parsed_stops_immediately() {
        let fixture = Fixture::linear(2);
        let instr = fixture.isa.single(Symbol::X, 0u32).unwrap();
        let (pass, program) = fixture.pipeline().run(&[instr], "parsed").unwrap();
        assert_eq!(pass, PassName::Parsed);
        match program {
            Program::Instructions(list) => {
                assert_eq!(list.len(), 1);
                assert!(!list[0].is_mapped);
            }
            Program::Gates(_) => panic!("parsed must stop before native gates"),
        }
    }

    #[test]
    fn test_mapped_marks_instructions() {
        let fixture = Fixture::linear(2);
        let instr = fixture.isa.controlled(Symbol::Cx, 0u32, 1u32).unwrap();
        let (_, program) = fixture.pipeline().run(&[instr], "mapped").unwrap();
        let Program::Instructions(list) = program else {
            panic!("expected instructions");
        };
        assert!(list.iter().all(|i| i.is_mapped));
    }

    #[test]
    fn test_swapped_inserts_sandwich() {
        let fixture = Fixture::linear(4);
        let instr = fixture.isa.controlled(Symbol::Cx, 0u32, 3u32).unwrap();
        let (_, program) = fixture.pipeline().run(&[instr], "swapped").unwrap();
        let Program::Instructions(list) = program else {
            panic!("expected instructions");
        };
        let symbols: Vec<Symbol> = list.iter().map(|i| i.symbol).collect();
        assert_eq!(
            symbols,
            vec![
                Symbol::Swap,
                Symbol::Swap,
                Symbol::Cx,
                Symbol::Swap,
                Symbol::Swap,
            ]
        );
    }

    #[test]
    fn test_expanded_flattens() {
        let fixture = Fixture::linear(2);
        let u2 = fixture
            .isa
            .single_param(Symbol::U2, 0u32, vec![0.5, 1.0])
            .unwrap();
        let (_, program) = fixture.pipeline().run(&[u2], "expanded").unwrap();
        let Program::Instructions(list) = program else {
            panic!("expected instructions");
        };
        let symbols: Vec<Symbol> = list.iter().map(|i| i.symbol).collect();
        assert_eq!(symbols, vec![Symbol::Rz, Symbol::Ry, Symbol::Rz]);
    }

    #[test]
    fn test_transpiled_is_native_only() {
        let fixture = Fixture::linear(2);
        let program = vec![
            fixture.isa.single(Symbol::H, 0u32).unwrap(),
            fixture.isa.controlled(Symbol::Cx, 0u32, 1u32).unwrap(),
            fixture.isa.measure(vec![QubitId(0), QubitId(1)]),
        ];
        let (pass, output) = fixture.pipeline().run(&program, "transpiled").unwrap();
        assert_eq!(pass, PassName::Transpiled);
        let Program::Gates(gates) = output else {
            panic!("expected gates");
        };
        assert!(gates.iter().all(|g| matches!(
            g.symbol,
            Symbol::Rx | Symbol::Ry | Symbol::Sqiswap | Symbol::Measure
        )));
        // Each qubit measured exactly once.
        let measured: Vec<QubitId> = gates
            .iter()
            .filter(|g| g.symbol == Symbol::Measure)
            .flat_map(|g| g.target_qubits.clone())
            .collect();
        assert_eq!(measured, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_executed_compiles_like_transpiled() {
        let fixture = Fixture::linear(2);
        let program = vec![fixture.isa.single(Symbol::X, 0u32).unwrap()];
        let (pass, output) = fixture.pipeline().run(&program, "executed").unwrap();
        assert_eq!(pass, PassName::Executed);
        assert!(matches!(output, Program::Gates(_)));
    }

    #[test]
    fn test_order_preserved_across_passes() {
        let fixture = Fixture::linear(3);
        let program = vec![
            fixture.isa.single(Symbol::H, 0u32).unwrap(),
            fixture.isa.controlled(Symbol::Cx, 0u32, 2u32).unwrap(),
            fixture.isa.single(Symbol::X, 1u32).unwrap(),
        ];
        let (_, output) = fixture.pipeline().run(&program, "swapped").unwrap();
        let Program::Instructions(list) = output else {
            panic!("expected instructions");
        };
        // The h stays first, the x stays last; routing grows only the
        // middle.
        assert_eq!(list.first().unwrap().symbol, Symbol::H);
        assert_eq!(list.last().unwrap().symbol, Symbol::X);
    }
}
