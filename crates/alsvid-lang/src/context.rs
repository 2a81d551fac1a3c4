//! Instruction collectors for circuit and test scopes.

use alsvid_ir::{Context, Instruction, challenge};

use crate::error::LangResult;

/// Collector handed to the body of a circuit scope.
///
/// Appending challenges the instruction under the circuit context, so
/// errors surface at the line that adds the offending instruction, not
/// at scope close.
#[derive(Debug)]
pub struct CircuitScope {
    instructions: Vec<Instruction>,
}

impl CircuitScope {
    pub(crate) fn new() -> Self {
        Self {
            instructions: vec![],
        }
    }

    /// Challenge and append one instruction.
    pub fn add(&mut self, instruction: Instruction) -> LangResult<&mut Self> {
        let challenged = challenge(&instruction, Some(Context::Circuit))?;
        self.instructions.push(challenged);
        Ok(self)
    }

    /// Challenge and append a block of instructions in order.
    pub fn add_all(
        &mut self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> LangResult<&mut Self> {
        for instruction in instructions {
            self.add(instruction)?;
        }
        Ok(self)
    }

    /// The challenged instructions accepted so far, in append order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

/// Collector handed to the body of a test scope.
#[derive(Debug)]
pub struct TestScope {
    instructions: Vec<Instruction>,
}

impl TestScope {
    pub(crate) fn new() -> Self {
        Self {
            instructions: vec![],
        }
    }

    /// Challenge and append one instruction.
    pub fn add(&mut self, instruction: Instruction) -> LangResult<&mut Self> {
        let challenged = challenge(&instruction, Some(Context::Test))?;
        self.instructions.push(challenged);
        Ok(self)
    }

    /// The challenged instructions accepted so far, in append order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
