//! Virtual to physical qubit mapping.

use alsvid_ir::{Instruction, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::topology::Topology;

/// A one-to-one assignment of the virtual register prefix `0..n-1`
/// onto physical qubits, in the order the topology yields them.
///
/// Mappings may be relabeled in the future to enable smarter
/// compilation; for now the assignment is fixed at construction.
#[derive(Debug, Clone)]
pub struct Mapping {
    physical: Vec<QubitId>,
}

impl Mapping {
    /// Map `virtual_count` virtual qubits onto the topology.
    ///
    /// A program can request fewer qubits than the device provides;
    /// requesting more fails with [`CompileError::NotEnoughQubits`].
    pub fn new(virtual_count: u32, topology: &Topology) -> CompileResult<Self> {
        let available = topology.qubits();
        if virtual_count as usize > available.len() {
            return Err(CompileError::NotEnoughQubits {
                requested: virtual_count,
                available: available.len() as u32,
            });
        }
        Ok(Self {
            physical: available[..virtual_count as usize].to_vec(),
        })
    }

    /// Number of virtual qubits.
    pub fn virtual_count(&self) -> u32 {
        self.physical.len() as u32
    }

    /// The virtual register as a list of indices.
    pub fn virtual_qubits(&self) -> Vec<QubitId> {
        (0..self.physical.len()).map(QubitId::from).collect()
    }

    /// Physical qubit assigned to a virtual index.
    pub fn physical(&self, virtual_qubit: QubitId) -> Option<QubitId> {
        self.physical.get(virtual_qubit.0 as usize).copied()
    }

    /// Substitute physical indices for virtual ones.
    ///
    /// Returns a new instruction with `is_mapped` set; the input is
    /// untouched. Instructions without qubit operands pass through.
    pub fn map(&self, instruction: &Instruction) -> CompileResult<Instruction> {
        let mut mapped = instruction.clone();
        for qubit in mapped
            .target_qubits
            .iter_mut()
            .chain(mapped.control_qubits.iter_mut())
        {
            *qubit = self
                .physical(*qubit)
                .ok_or(CompileError::NotEnoughQubits {
                    requested: qubit.0 + 1,
                    available: self.virtual_count(),
                })?;
        }
        mapped.is_mapped = true;
        Ok(mapped)
    }
}
