//! OpenQASM 3.0 emitter for high-level instruction programs.

use std::fs;
use std::path::Path;

use alsvid_ir::{Instruction, Symbol};

use crate::error::{EmitError, EmitResult};

/// Emit a challenged instruction list as an OpenQASM 3.0 program.
pub fn emit(instructions: &[Instruction], num_qubits: u32, num_bits: u32) -> EmitResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_program(instructions, num_qubits, num_bits)
}

/// Emit a program and also write it to `path` as UTF-8, creating
/// parent directories as needed. The full text is returned either way.
pub fn emit_to_file(
    instructions: &[Instruction],
    num_qubits: u32,
    num_bits: u32,
    path: impl AsRef<Path>,
) -> EmitResult<String> {
    let program = emit(instructions, num_qubits, num_bits)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &program)?;
    Ok(program)
}

/// QASM3 emitter.
struct Emitter {
    lines: Vec<String>,
}

impl Emitter {
    fn new() -> Self {
        Self { lines: vec![] }
    }

    fn emit_program(
        &mut self,
        instructions: &[Instruction],
        num_qubits: u32,
        num_bits: u32,
    ) -> EmitResult<String> {
        self.lines.push("OPENQASM 3.0;".to_string());
        self.lines.push(format!("qubit[{num_qubits}] q;"));
        self.lines.push(format!("bit[{num_bits}] c;"));

        for instruction in instructions {
            let line = emit_instruction(instruction)?;
            self.lines.push(line);
        }

        Ok(self.lines.join("\n"))
    }
}

/// Render one instruction as QASM source.
pub fn emit_instruction(instruction: &Instruction) -> EmitResult<String> {
    let op = mnemonic(instruction.symbol)
        .ok_or(EmitError::UnknownInstruction(instruction.symbol))?;

    let targets: Vec<String> = instruction
        .target_qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect();

    if instruction.symbol == Symbol::Measure {
        if targets.is_empty() {
            return Err(EmitError::MalformedInstruction {
                symbol: instruction.symbol,
                cause: "no target qubits".to_string(),
            });
        }
        return Ok(targets
            .iter()
            .enumerate()
            .map(|(i, q)| format!("measure {q} -> c[{i}];"))
            .collect::<Vec<_>>()
            .join("\n"));
    }

    if instruction.symbol == Symbol::Reset {
        return Ok(targets
            .iter()
            .map(|q| format!("reset {q};"))
            .collect::<Vec<_>>()
            .join("\n"));
    }

    // OpenQASM 3.0 operand order: control(s) before target(s).
    let mut operands: Vec<String> = instruction
        .control_qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect();
    operands.extend(targets);

    let call = match instruction.params.as_deref() {
        Some(params) if !params.is_empty() => {
            let rendered: Vec<String> = params.iter().map(|p| format_param(*p)).collect();
            format!("{op}({})", rendered.join(", "))
        }
        _ => op.to_string(),
    };

    Ok(format!("{call} {};", operands.join(" , ")))
}

/// QASM mnemonic for a symbol; identity over the symbols the language
/// can express. `nop`, the test primitives, `ftol`, and `sqiswap` have
/// no QASM spelling.
fn mnemonic(symbol: Symbol) -> Option<&'static str> {
    match symbol {
        Symbol::X
        | Symbol::Y
        | Symbol::Z
        | Symbol::H
        | Symbol::S
        | Symbol::Sdg
        | Symbol::T
        | Symbol::Tdg
        | Symbol::P
        | Symbol::Rx
        | Symbol::Ry
        | Symbol::Rz
        | Symbol::Phase
        | Symbol::U2
        | Symbol::U3
        | Symbol::Cx
        | Symbol::Cy
        | Symbol::Cz
        | Symbol::Ch
        | Symbol::Cp
        | Symbol::Crx
        | Symbol::Cry
        | Symbol::Crz
        | Symbol::Cphase
        | Symbol::Cu
        | Symbol::Swap
        | Symbol::Measure
        | Symbol::Reset => Some(symbol.name()),
        _ => None,
    }
}

/// Render a parameter the way C's `%.10g` would: ten significant
/// digits, trailing zeros trimmed, scientific notation outside the
/// fixed-point range.
fn format_param(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{value}");
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= 10 {
        let mut rendered = format!("{value:.9e}");
        if let Some(epos) = rendered.find('e') {
            let (mantissa, exp) = rendered.split_at(epos);
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            rendered = format!("{mantissa}{exp}");
        }
        rendered
    } else {
        let decimals = (9 - exponent).max(0) as usize;
        let rendered = format!("{value:.decimals$}");
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{Isa, QubitId};

    fn isa() -> Isa {
        Isa::new("test")
    }

    #[test]
    fn test_header() {
        let program = emit(&[], 3, 3).unwrap();
        let lines: Vec<&str> = program.lines().collect();
        assert_eq!(lines[0], "OPENQASM 3.0;");
        assert_eq!(lines[1], "qubit[3] q;");
        assert_eq!(lines[2], "bit[3] c;");
    }

    #[test]
    fn test_single_qubit_gate() {
        let instr = isa().single(Symbol::X, 0u32).unwrap();
        assert_eq!(emit_instruction(&instr).unwrap(), "x q[0];");
    }

    #[test]
    fn test_parametric_gate() {
        let instr = isa().single_param(Symbol::Rx, 0u32, vec![1.57]).unwrap();
        assert_eq!(emit_instruction(&instr).unwrap(), "rx(1.57) q[0];");
    }

    #[test]
    fn test_two_qubit_gate_control_first() {
        let instr = isa().controlled(Symbol::Cx, 0u32, 1u32).unwrap();
        assert_eq!(emit_instruction(&instr).unwrap(), "cx q[0] , q[1];");
    }

    #[test]
    fn test_measure_per_target() {
        let instr = isa().measure(vec![QubitId(0), QubitId(1)]);
        assert_eq!(
            emit_instruction(&instr).unwrap(),
            "measure q[0] -> c[0];\nmeasure q[1] -> c[1];"
        );
    }

    #[test]
    fn test_reset_per_target() {
        let instr = isa().reset(vec![QubitId(0), QubitId(2)]);
        assert_eq!(
            emit_instruction(&instr).unwrap(),
            "reset q[0];\nreset q[2];"
        );
    }

    #[test]
    fn test_measure_without_targets_malformed() {
        let instr = isa().measure(vec![]);
        let err = emit_instruction(&instr).unwrap_err();
        assert!(matches!(err, EmitError::MalformedInstruction { .. }));
    }

    #[test]
    fn test_unknown_symbols_rejected() {
        for instr in [
            isa().nop(vec![QubitId(0)]),
            isa().ftol(0.9),
            isa().test(Symbol::Rocalib, vec![QubitId(0)], None, 10).unwrap(),
        ] {
            let err = emit_instruction(&instr).unwrap_err();
            assert!(matches!(err, EmitError::UnknownInstruction(_)));
        }
    }

    #[test]
    fn test_param_rendering() {
        assert_eq!(format_param(1.57), "1.57");
        assert_eq!(format_param(0.0), "0");
        assert_eq!(format_param(-0.5), "-0.5");
        assert_eq!(format_param(std::f64::consts::PI), "3.141592654");
        assert_eq!(format_param(2.0), "2");
        assert_eq!(format_param(1e-7), "1e-7");
    }

    #[test]
    fn test_full_program_mentions_instructions_in_order() {
        let program = vec![
            isa().single(Symbol::X, 0u32).unwrap(),
            isa().controlled(Symbol::Cx, 0u32, 1u32).unwrap(),
            isa().measure(vec![QubitId(0), QubitId(1)]),
        ];
        let text = emit(&program, 2, 2).unwrap();

        assert!(text.contains("OPENQASM 3.0;"));
        assert!(text.contains("qubit[2] q;"));
        assert!(text.contains("bit[2] c;"));
        let x = text.find("x q[0];").unwrap();
        let cx = text.find("cx q[0] , q[1];").unwrap();
        let m0 = text.find("measure q[0] -> c[0];").unwrap();
        let m1 = text.find("measure q[1] -> c[1];").unwrap();
        assert!(x < cx && cx < m0 && m0 < m1);
    }

    #[test]
    fn test_emit_to_file_creates_parents() {
        let dir = std::env::temp_dir().join("alsvid-qasm3-test");
        let path = dir.join("nested").join("program.qasm");
        let _ = fs::remove_dir_all(&dir);

        let program = vec![isa().single(Symbol::H, 0u32).unwrap()];
        let text = emit_to_file(&program, 1, 1, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(text, written);

        let _ = fs::remove_dir_all(&dir);
    }
}
