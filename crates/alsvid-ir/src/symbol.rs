//! Instruction symbols and their descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbol of the instruction set.
///
/// The set is closed: circuit symbols issued by users, hardware
/// characterization primitives for test blocks, the `ftol` state
/// control instruction, and `sqiswap`, which only appears in native
/// gate output. Text outside this set is rejected at the parse
/// boundary, and every dispatch table keeps an explicit arm that
/// rejects symbols it does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    // Circuit symbols
    Nop,
    Swap,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    P,
    Rx,
    Ry,
    Rz,
    Phase,
    U2,
    U3,
    Cx,
    Cy,
    Cz,
    Ch,
    Cp,
    Crx,
    Cry,
    Crz,
    Cphase,
    Cu,
    Measure,
    Reset,
    // Hardware characterization primitives
    Resfreq,
    Satspect,
    Powrab,
    Pispec,
    Resspect,
    Dispshift,
    Rocalib,
    // QPU state control
    Ftol,
    // Native-only: the two-qubit entangling primitive of the device
    Sqiswap,
}

/// Shape of a symbol as seen by the ISA factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Fixed single-qubit gate.
    SingleFixed,
    /// Parametric single-qubit gate.
    SingleParam,
    /// Fixed controlled two-qubit gate.
    ControlledFixed,
    /// Parametric controlled two-qubit gate.
    ControlledParam,
    /// Symmetric two-operand gate (swap).
    Symmetric,
    /// Multi-target register operation (nop, measure, reset).
    MultiTarget,
    /// QPU state control instruction (ftol).
    QpuControl,
    /// Hardware characterization primitive.
    Test,
    /// Only produced by transpilation, never by the factory.
    NativeOnly,
}

/// Descriptor consulted by the factory builders: the class of a symbol
/// and the number of parameters its builder must receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Builder class.
    pub class: SymbolClass,
    /// Required parameter count (0 for fixed gates; tests are free-form).
    pub param_count: usize,
}

impl Symbol {
    /// Lowercase mnemonic, identical to the wire and QASM spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Nop => "nop",
            Symbol::Swap => "swap",
            Symbol::X => "x",
            Symbol::Y => "y",
            Symbol::Z => "z",
            Symbol::H => "h",
            Symbol::S => "s",
            Symbol::Sdg => "sdg",
            Symbol::T => "t",
            Symbol::Tdg => "tdg",
            Symbol::P => "p",
            Symbol::Rx => "rx",
            Symbol::Ry => "ry",
            Symbol::Rz => "rz",
            Symbol::Phase => "phase",
            Symbol::U2 => "u2",
            Symbol::U3 => "u3",
            Symbol::Cx => "cx",
            Symbol::Cy => "cy",
            Symbol::Cz => "cz",
            Symbol::Ch => "ch",
            Symbol::Cp => "cp",
            Symbol::Crx => "crx",
            Symbol::Cry => "cry",
            Symbol::Crz => "crz",
            Symbol::Cphase => "cphase",
            Symbol::Cu => "cu",
            Symbol::Measure => "measure",
            Symbol::Reset => "reset",
            Symbol::Resfreq => "resfreq",
            Symbol::Satspect => "satspect",
            Symbol::Powrab => "powrab",
            Symbol::Pispec => "pispec",
            Symbol::Resspect => "resspect",
            Symbol::Dispshift => "dispshift",
            Symbol::Rocalib => "rocalib",
            Symbol::Ftol => "ftol",
            Symbol::Sqiswap => "sqiswap",
        }
    }

    /// Look a symbol up by its mnemonic.
    pub fn from_name(name: &str) -> Option<Symbol> {
        Some(match name {
            "nop" => Symbol::Nop,
            "swap" => Symbol::Swap,
            "x" => Symbol::X,
            "y" => Symbol::Y,
            "z" => Symbol::Z,
            "h" => Symbol::H,
            "s" => Symbol::S,
            "sdg" => Symbol::Sdg,
            "t" => Symbol::T,
            "tdg" => Symbol::Tdg,
            "p" => Symbol::P,
            "rx" => Symbol::Rx,
            "ry" => Symbol::Ry,
            "rz" => Symbol::Rz,
            "phase" => Symbol::Phase,
            "u2" => Symbol::U2,
            "u3" => Symbol::U3,
            "cx" => Symbol::Cx,
            "cy" => Symbol::Cy,
            "cz" => Symbol::Cz,
            "ch" => Symbol::Ch,
            "cp" => Symbol::Cp,
            "crx" => Symbol::Crx,
            "cry" => Symbol::Cry,
            "crz" => Symbol::Crz,
            "cphase" => Symbol::Cphase,
            "cu" => Symbol::Cu,
            "measure" => Symbol::Measure,
            "reset" => Symbol::Reset,
            "resfreq" => Symbol::Resfreq,
            "satspect" => Symbol::Satspect,
            "powrab" => Symbol::Powrab,
            "pispec" => Symbol::Pispec,
            "resspect" => Symbol::Resspect,
            "dispshift" => Symbol::Dispshift,
            "rocalib" => Symbol::Rocalib,
            "ftol" => Symbol::Ftol,
            "sqiswap" => Symbol::Sqiswap,
            _ => return None,
        })
    }

    /// Descriptor driving the factory builders.
    pub fn descriptor(&self) -> Descriptor {
        use SymbolClass::*;
        let (class, param_count) = match self {
            Symbol::X
            | Symbol::Y
            | Symbol::Z
            | Symbol::H
            | Symbol::S
            | Symbol::Sdg
            | Symbol::T
            | Symbol::Tdg => (SingleFixed, 0),
            Symbol::P | Symbol::Rx | Symbol::Ry | Symbol::Rz | Symbol::Phase => (SingleParam, 1),
            Symbol::U2 => (SingleParam, 2),
            Symbol::U3 => (SingleParam, 3),
            Symbol::Cx | Symbol::Cy | Symbol::Cz | Symbol::Ch => (ControlledFixed, 0),
            Symbol::Cp | Symbol::Crx | Symbol::Cry | Symbol::Crz | Symbol::Cphase => {
                (ControlledParam, 1)
            }
            Symbol::Cu => (ControlledParam, 3),
            Symbol::Swap => (Symmetric, 0),
            Symbol::Nop | Symbol::Measure | Symbol::Reset => (MultiTarget, 0),
            Symbol::Ftol => (QpuControl, 1),
            Symbol::Resfreq
            | Symbol::Satspect
            | Symbol::Powrab
            | Symbol::Pispec
            | Symbol::Resspect
            | Symbol::Dispshift
            | Symbol::Rocalib => (Test, 0),
            Symbol::Sqiswap => (NativeOnly, 0),
        };
        Descriptor { class, param_count }
    }

    /// True for hardware characterization primitives.
    pub fn is_test(&self) -> bool {
        self.descriptor().class == SymbolClass::Test
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for sym in [
            Symbol::Nop,
            Symbol::Swap,
            Symbol::Sdg,
            Symbol::Cphase,
            Symbol::Dispshift,
            Symbol::Ftol,
            Symbol::Sqiswap,
        ] {
            assert_eq!(Symbol::from_name(sym.name()), Some(sym));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert_eq!(Symbol::from_name("frobnicate"), None);
        assert_eq!(Symbol::from_name(""), None);
    }

    #[test]
    fn test_serde_names_match_mnemonics() {
        let json = serde_json::to_string(&Symbol::Cphase).unwrap();
        assert_eq!(json, "\"cphase\"");
        let back: Symbol = serde_json::from_str("\"sqiswap\"").unwrap();
        assert_eq!(back, Symbol::Sqiswap);
    }

    #[test]
    fn test_descriptor_param_counts() {
        assert_eq!(Symbol::U2.descriptor().param_count, 2);
        assert_eq!(Symbol::U3.descriptor().param_count, 3);
        assert_eq!(Symbol::Cu.descriptor().param_count, 3);
        assert_eq!(Symbol::Rx.descriptor().param_count, 1);
        assert_eq!(Symbol::H.descriptor().param_count, 0);
    }
}
