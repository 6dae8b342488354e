//! Program construction with symbolic jump labels.
//!
//! Jumps are emitted against [`Label`]s and patched to concrete offsets in
//! [`ProgramBuilder::build`]. A jump to a label bound at or before the jump
//! becomes `JumpBackward`; only unconditional jumps may go backward.

use indexmap::IndexSet;
use thiserror::Error;
use vexpr_core::NumericKind;

use crate::constant::{ConstId, Constant, SlotId};
use crate::instruction::Instruction;
use crate::program::Program;
use crate::verify::VerifyError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("label L{0} is never bound")]
    UnboundLabel(u32),

    #[error("label L{0} is bound twice")]
    LabelRebound(u32),

    #[error("ip {ip}: conditional jump cannot go backward")]
    BackwardConditional { ip: usize },

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

/// Symbolic jump destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Label(u32);

/// Branch flavor of a symbolic jump.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JumpKind {
    Always,
    IfTrue,
    IfFalse,
}

#[derive(Clone, Copy, Debug)]
struct Fixup {
    ip: usize,
    kind: JumpKind,
    label: Label,
}

/// Incremental program builder.
///
/// Constants are deduplicated: interning an equal constant twice yields the
/// same [`ConstId`]. The slot count grows to cover every slot referenced.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    code: Vec<Instruction>,
    constants: IndexSet<Constant>,
    labels: Vec<Option<usize>>,
    fixups: Vec<Fixup>,
    slots: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next emitted instruction will get.
    pub fn position(&self) -> usize {
        self.code.len()
    }

    /// Append an instruction, returning its index.
    pub fn emit(&mut self, inst: Instruction) -> usize {
        if let Some(slot) = inst.slot() {
            self.slots = self.slots.max(slot.0 + 1);
        }
        self.code.push(inst);
        self.code.len() - 1
    }

    pub fn constant(&mut self, constant: Constant) -> ConstId {
        let (index, _) = self.constants.insert_full(constant);
        ConstId(index as u32)
    }

    /// Reserve at least `count` variable slots.
    pub fn reserve_slots(&mut self, count: u32) {
        self.slots = self.slots.max(count);
    }

    pub fn label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() as u32 - 1)
    }

    /// Bind `label` to the next emitted instruction.
    pub fn bind(&mut self, label: Label) -> Result<(), BuildError> {
        let position = self.position();
        let slot = &mut self.labels[label.0 as usize];
        if slot.is_some() {
            return Err(BuildError::LabelRebound(label.0));
        }
        *slot = Some(position);
        Ok(())
    }

    /// Emit a jump to `label`, patched when the program is built.
    pub fn jump(&mut self, kind: JumpKind, label: Label) -> usize {
        let ip = self.emit(Instruction::Jump { offset: 0 });
        self.fixups.push(Fixup { ip, kind, label });
        ip
    }

    pub fn push(&mut self, constant: Constant) -> usize {
        let constant = self.constant(constant);
        self.emit(Instruction::Push { constant })
    }

    pub fn push_int(&mut self, value: i64) -> usize {
        self.push(Constant::Int(value))
    }

    pub fn push_float(&mut self, value: f64) -> usize {
        self.push(Constant::Float(value))
    }

    pub fn push_string(&mut self, value: impl Into<String>) -> usize {
        self.push(Constant::String(value.into()))
    }

    pub fn fetch_env(&mut self, name: impl Into<String>) -> usize {
        let name = self.constant(Constant::String(name.into()));
        self.emit(Instruction::FetchEnv { name })
    }

    pub fn fetch_env_fast(&mut self, path: Vec<u32>) -> usize {
        let path = self.constant(Constant::FieldPath(path));
        self.emit(Instruction::FetchEnvFast { path })
    }

    pub fn property(&mut self, name: impl Into<String>) -> usize {
        let name = self.constant(Constant::String(name.into()));
        self.emit(Instruction::Property { name })
    }

    pub fn matches_const(&mut self, pattern: impl Into<String>) -> usize {
        let pattern = self.constant(Constant::Regex(pattern.into()));
        self.emit(Instruction::MatchesConst { pattern })
    }

    pub fn call_fast(&mut self, index: u32, arity: u16) -> usize {
        let function = self.constant(Constant::Function { index, arity });
        self.emit(Instruction::CallFast {
            function,
            argc: arity,
        })
    }

    pub fn method(&mut self, name: impl Into<String>, argc: u16) -> usize {
        let name = self.constant(Constant::String(name.into()));
        self.emit(Instruction::Method { name, argc })
    }

    pub fn cast(&mut self, to: NumericKind) -> usize {
        self.emit(Instruction::Cast { to })
    }

    pub fn store(&mut self, slot: u32) -> usize {
        self.emit(Instruction::Store { slot: SlotId(slot) })
    }

    pub fn load(&mut self, slot: u32) -> usize {
        self.emit(Instruction::Load { slot: SlotId(slot) })
    }

    pub fn inc(&mut self, slot: u32) -> usize {
        self.emit(Instruction::Inc { slot: SlotId(slot) })
    }

    /// Patch jumps, then verify the result.
    pub fn build(self) -> Result<Program, BuildError> {
        let program = self.finish()?;
        program.verify()?;
        Ok(program)
    }

    /// Patch jumps without verifying.
    pub fn finish(mut self) -> Result<Program, BuildError> {
        for fixup in std::mem::take(&mut self.fixups) {
            let target = self.labels[fixup.label.0 as usize]
                .ok_or(BuildError::UnboundLabel(fixup.label.0))?;
            self.code[fixup.ip] = patch(fixup, target)?;
        }
        Ok(Program::new(
            self.code,
            self.constants.into_iter().collect(),
            self.slots,
        ))
    }
}

fn patch(fixup: Fixup, target: usize) -> Result<Instruction, BuildError> {
    let next = fixup.ip + 1;
    if target >= next {
        let offset = (target - next) as u32;
        return Ok(match fixup.kind {
            JumpKind::Always => Instruction::Jump { offset },
            JumpKind::IfTrue => Instruction::JumpIfTrue { offset },
            JumpKind::IfFalse => Instruction::JumpIfFalse { offset },
        });
    }
    match fixup.kind {
        JumpKind::Always => Ok(Instruction::JumpBackward {
            offset: (next - target) as u32,
        }),
        _ => Err(BuildError::BackwardConditional { ip: fixup.ip }),
    }
}
