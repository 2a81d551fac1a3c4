//! The classical register.

use rustc_hash::FxHashMap;

use crate::error::{LangError, LangResult};

/// A classical register: a bit width plus, after a circuit closes, an
/// ensemble of measurement outcomes keyed by fixed-width big-endian
/// binary strings.
///
/// The register is written exactly once per circuit close via
/// [`absorb`](Self::absorb) and queried via
/// [`frequencies`](Self::frequencies).
#[derive(Debug, Clone, Default)]
pub struct ClassicalRegister {
    bit_count: u32,
    data: Option<FxHashMap<String, i64>>,
}

impl ClassicalRegister {
    /// Create a register of the given bit width.
    pub fn new(bit_count: u32) -> Self {
        Self {
            bit_count,
            data: None,
        }
    }

    /// Bit width of this register.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Store an outcome ensemble.
    pub fn absorb(&mut self, data: FxHashMap<String, i64>) {
        self.data = Some(data);
    }

    /// Raw outcome counts, if a circuit has closed into this register.
    pub fn counts(&self) -> Option<&FxHashMap<String, i64>> {
        self.data.as_ref()
    }

    /// Relative frequency of each outcome.
    ///
    /// An all-zero ensemble yields all-zero frequencies instead of
    /// dividing by zero. Querying before any absorb fails with
    /// [`LangError::NoMeasurementsAvailable`].
    pub fn frequencies(&self) -> LangResult<FxHashMap<String, f64>> {
        let data = self.data.as_ref().ok_or(LangError::NoMeasurementsAvailable)?;
        let total: i64 = data.values().sum();

        if total == 0 {
            return Ok(data.keys().map(|k| (k.clone(), 0.0)).collect());
        }

        Ok(data
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect())
    }
}
