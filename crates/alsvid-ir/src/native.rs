//! Native command records, serializable to the backend.
//!
//! These are the records that cross the wire after compilation: gates
//! in the device's native alphabet, QPU state controls, and hardware
//! characterization tests. Application order equals list order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::QubitId;
use crate::symbol::Symbol;

/// A native gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Native symbol (rx, ry, sqiswap, measure, reset, nop).
    pub symbol: Symbol,
    /// Target qubits.
    pub target_qubits: Vec<QubitId>,
    /// Control qubits, when the gate is an entangler.
    pub control_qubits: Option<Vec<QubitId>>,
    /// Rotation parameters in radians.
    pub params: Option<Vec<f64>>,
}

impl Gate {
    /// Create a new native gate record.
    pub fn new(
        symbol: Symbol,
        target_qubits: Vec<QubitId>,
        control_qubits: Option<Vec<QubitId>>,
        params: Option<Vec<f64>>,
    ) -> Self {
        Self {
            symbol,
            target_qubits,
            control_qubits,
            params,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "G: {} @ {:?} ctrl by {:?} w/ params={:?}",
            self.symbol, self.target_qubits, self.control_qubits, self.params
        )
    }
}

/// A QPU state control command. Parameters modulate its behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Control symbol (ftol).
    pub symbol: Symbol,
    /// Modulation parameters.
    pub params: Option<Vec<f64>>,
}

impl Control {
    /// Create a new control record.
    pub fn new(symbol: Symbol, params: Option<Vec<f64>>) -> Self {
        Self { symbol, params }
    }
}

/// A hardware characterization command. Tests require a shot count to
/// yield meaningful statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Test symbol.
    pub symbol: Symbol,
    /// Test parameters.
    pub params: Option<Vec<f64>>,
    /// Number of shots.
    pub shots: u32,
}

impl Test {
    /// Create a new test record.
    pub fn new(symbol: Symbol, params: Option<Vec<f64>>, shots: u32) -> Self {
        Self {
            symbol,
            params,
            shots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_serializes_flat() {
        let gate = Gate::new(
            Symbol::Sqiswap,
            vec![QubitId(1)],
            Some(vec![QubitId(0)]),
            None,
        );
        let json = serde_json::to_value(&gate).unwrap();
        assert_eq!(json["symbol"], "sqiswap");
        assert_eq!(json["target_qubits"][0], 1);
        assert_eq!(json["control_qubits"][0], 0);
        assert!(json["params"].is_null());
    }

    #[test]
    fn test_test_record_carries_shots() {
        let record = Test::new(Symbol::Powrab, Some(vec![0.5]), 2048);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["shots"], 2048);
        assert_eq!(json["symbol"], "powrab");
    }

    #[test]
    fn test_control_record() {
        let record = Control::new(Symbol::Ftol, Some(vec![0.95]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["symbol"], "ftol");
        assert_eq!(json["params"][0], 0.95);
    }
}
