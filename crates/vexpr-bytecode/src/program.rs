//! Executable programs.

use serde::{Deserialize, Serialize};

use crate::constant::{ConstId, Constant};
use crate::instruction::Instruction;
use crate::verify::{Verified, VerifyError, verify};

/// Instruction sequence, constant pool and variable-slot count.
///
/// Construction does not check well-formedness; run [`Program::verify`] (or
/// build through [`crate::ProgramBuilder`]) before handing a program to an
/// executor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    constants: Vec<Constant>,
    code: Vec<Instruction>,
    #[serde(default)]
    slots: u32,
}

impl Program {
    pub fn new(code: Vec<Instruction>, constants: Vec<Constant>, slots: u32) -> Self {
        Self {
            constants,
            code,
            slots,
        }
    }

    /// Parse the JSON assembly form: `{"constants": [...], "code": [...], "slots": n}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn constant(&self, id: ConstId) -> Option<&Constant> {
        self.constants.get(id.index())
    }

    pub fn slots(&self) -> u32 {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Check the well-formedness contract.
    pub fn verify(&self) -> Result<Verified, VerifyError> {
        verify(self)
    }
}
