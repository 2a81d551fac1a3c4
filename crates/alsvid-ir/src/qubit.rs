//! Qubit index type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit.
///
/// Before mapping this names a virtual line of the user's register;
/// after mapping it names a physical qubit on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
    }

    #[test]
    fn test_qubit_ordering() {
        assert!(QubitId(1) < QubitId(2));
    }
}
