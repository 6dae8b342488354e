//! Instruction set and program format for the vexpr stack machine.
//!
//! This crate contains:
//! - The closed opcode catalog with stack effects and fast/generic pairs
//! - Typed instructions, constants and programs
//! - `ProgramBuilder` with symbolic labels
//! - The well-formedness verifier
//! - Binary encoding and a human-readable dump

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod builder;
mod codec;
mod constant;
mod dump;
mod instruction;
mod opcode;
mod program;
mod verify;

#[cfg(test)]
mod verify_tests;

pub use builder::{BuildError, JumpKind, Label, ProgramBuilder};
pub use codec::{DecodeError, EncodeError, HEADER_SIZE, Header, MAGIC, VERSION, decode, encode};
pub use constant::{ConstId, Constant, SlotId};
pub use dump::{dump, width_for_count};
pub use instruction::Instruction;
pub use opcode::{Category, OPCODE_COUNT, Opcode, Operands, StackEffect};
pub use program::Program;
pub use verify::{Verified, VerifyError, verify};
