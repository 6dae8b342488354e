//! Typed instructions.
//!
//! There is no sentinel variant: an in-memory program cannot contain the
//! catalog marker.

use std::fmt;

use serde::{Deserialize, Serialize};
use vexpr_core::NumericKind;

use crate::constant::{ConstId, SlotId};
use crate::opcode::{Opcode, StackEffect};

/// One decoded instruction with its operands.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Push a constant.
    Push { constant: ConstId },
    Pop,
    /// Swap the two topmost values.
    Rot,
    /// Index or member lookup: pops container and key.
    Fetch,
    /// Environment lookup by name (String constant).
    FetchEnv { name: ConstId },
    /// Environment lookup by precomputed address (FieldPath constant).
    FetchEnvFast { path: ConstId },
    True,
    False,
    Nil,
    Negate,
    Not,
    Equal,
    EqualInt,
    EqualString,
    /// Forward to `ip + 1 + offset`.
    Jump { offset: u32 },
    /// Pops the condition; branches forward when it is true.
    JumpIfTrue { offset: u32 },
    /// Pops the condition; branches forward when it is false.
    JumpIfFalse { offset: u32 },
    /// Back to `ip + 1 - offset`.
    JumpBackward { offset: u32 },
    In,
    Less,
    More,
    LessOrEqual,
    MoreOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    Range,
    Matches,
    /// Match against a precompiled pattern (Regex constant).
    MatchesConst { pattern: ConstId },
    Contains,
    StartsWith,
    EndsWith,
    /// Pops container, from, to.
    Slice,
    /// Member access by name (String constant).
    Property { name: ConstId },
    /// Callee below `argc` arguments.
    Call { argc: u16 },
    /// Statically resolved callee (Function constant), `argc` arguments.
    CallFast { function: ConstId, argc: u16 },
    /// Receiver below `argc` arguments, method name as String constant.
    Method { name: ConstId, argc: u16 },
    /// Build an array from the top `len` values.
    Array { len: u32 },
    /// Build a map from the top `len` key/value pairs.
    Map { len: u32 },
    Len,
    Cast { to: NumericKind },
    Store { slot: SlotId },
    Load { slot: SlotId },
    /// Increment a slot in place.
    Inc { slot: SlotId },
    BeginScope,
    EndScope,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        use Instruction as I;
        match self {
            I::Push { .. } => Opcode::Push,
            I::Pop => Opcode::Pop,
            I::Rot => Opcode::Rot,
            I::Fetch => Opcode::Fetch,
            I::FetchEnv { .. } => Opcode::FetchEnv,
            I::FetchEnvFast { .. } => Opcode::FetchEnvFast,
            I::True => Opcode::True,
            I::False => Opcode::False,
            I::Nil => Opcode::Nil,
            I::Negate => Opcode::Negate,
            I::Not => Opcode::Not,
            I::Equal => Opcode::Equal,
            I::EqualInt => Opcode::EqualInt,
            I::EqualString => Opcode::EqualString,
            I::Jump { .. } => Opcode::Jump,
            I::JumpIfTrue { .. } => Opcode::JumpIfTrue,
            I::JumpIfFalse { .. } => Opcode::JumpIfFalse,
            I::JumpBackward { .. } => Opcode::JumpBackward,
            I::In => Opcode::In,
            I::Less => Opcode::Less,
            I::More => Opcode::More,
            I::LessOrEqual => Opcode::LessOrEqual,
            I::MoreOrEqual => Opcode::MoreOrEqual,
            I::Add => Opcode::Add,
            I::Subtract => Opcode::Subtract,
            I::Multiply => Opcode::Multiply,
            I::Divide => Opcode::Divide,
            I::Modulo => Opcode::Modulo,
            I::Exponent => Opcode::Exponent,
            I::Range => Opcode::Range,
            I::Matches => Opcode::Matches,
            I::MatchesConst { .. } => Opcode::MatchesConst,
            I::Contains => Opcode::Contains,
            I::StartsWith => Opcode::StartsWith,
            I::EndsWith => Opcode::EndsWith,
            I::Slice => Opcode::Slice,
            I::Property { .. } => Opcode::Property,
            I::Call { .. } => Opcode::Call,
            I::CallFast { .. } => Opcode::CallFast,
            I::Method { .. } => Opcode::Method,
            I::Array { .. } => Opcode::Array,
            I::Map { .. } => Opcode::Map,
            I::Len => Opcode::Len,
            I::Cast { .. } => Opcode::Cast,
            I::Store { .. } => Opcode::Store,
            I::Load { .. } => Opcode::Load,
            I::Inc { .. } => Opcode::Inc,
            I::BeginScope => Opcode::BeginScope,
            I::EndScope => Opcode::EndScope,
        }
    }

    /// Operand-free instruction for an opcode, `None` if it takes operands.
    pub fn simple(op: Opcode) -> Option<Self> {
        use Instruction as I;
        Some(match op {
            Opcode::Pop => I::Pop,
            Opcode::Rot => I::Rot,
            Opcode::Fetch => I::Fetch,
            Opcode::True => I::True,
            Opcode::False => I::False,
            Opcode::Nil => I::Nil,
            Opcode::Negate => I::Negate,
            Opcode::Not => I::Not,
            Opcode::Equal => I::Equal,
            Opcode::EqualInt => I::EqualInt,
            Opcode::EqualString => I::EqualString,
            Opcode::In => I::In,
            Opcode::Less => I::Less,
            Opcode::More => I::More,
            Opcode::LessOrEqual => I::LessOrEqual,
            Opcode::MoreOrEqual => I::MoreOrEqual,
            Opcode::Add => I::Add,
            Opcode::Subtract => I::Subtract,
            Opcode::Multiply => I::Multiply,
            Opcode::Divide => I::Divide,
            Opcode::Modulo => I::Modulo,
            Opcode::Exponent => I::Exponent,
            Opcode::Range => I::Range,
            Opcode::Matches => I::Matches,
            Opcode::Contains => I::Contains,
            Opcode::StartsWith => I::StartsWith,
            Opcode::EndsWith => I::EndsWith,
            Opcode::Slice => I::Slice,
            Opcode::Len => I::Len,
            Opcode::BeginScope => I::BeginScope,
            Opcode::EndScope => I::EndScope,
            _ => return None,
        })
    }

    /// `(pops, pushes)` with operand counts applied.
    pub fn stack_effect(&self) -> (u32, u32) {
        let argc = match *self {
            Self::Call { argc } | Self::CallFast { argc, .. } | Self::Method { argc, .. } => {
                u32::from(argc)
            }
            Self::Array { len } | Self::Map { len } => len,
            _ => 0,
        };
        match self.opcode().stack_effect() {
            StackEffect::Fixed { pops, pushes } => (u32::from(pops), u32::from(pushes)),
            StackEffect::Args { extra } => (argc + u32::from(extra), 1),
            StackEffect::Elements { per } => (argc.saturating_mul(u32::from(per)), 1),
        }
    }

    /// Branch destination of a jump at `ip`. May lie outside the program.
    pub fn jump_target(&self, ip: usize) -> Option<i64> {
        let next = ip as i64 + 1;
        match *self {
            Self::Jump { offset } | Self::JumpIfTrue { offset } | Self::JumpIfFalse { offset } => {
                Some(next + i64::from(offset))
            }
            Self::JumpBackward { offset } => Some(next - i64::from(offset)),
            _ => None,
        }
    }

    /// Constant pool reference, if any.
    pub fn constant(&self) -> Option<ConstId> {
        match *self {
            Self::Push { constant } => Some(constant),
            Self::FetchEnv { name } | Self::Property { name } | Self::Method { name, .. } => {
                Some(name)
            }
            Self::FetchEnvFast { path } => Some(path),
            Self::MatchesConst { pattern } => Some(pattern),
            Self::CallFast { function, .. } => Some(function),
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<SlotId> {
        match *self {
            Self::Store { slot } | Self::Load { slot } | Self::Inc { slot } => Some(slot),
            _ => None,
        }
    }

    /// Append the wire form: opcode byte, then little-endian operands.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode().to_u8());
        match *self {
            Self::Push { constant: c }
            | Self::FetchEnv { name: c }
            | Self::FetchEnvFast { path: c }
            | Self::MatchesConst { pattern: c }
            | Self::Property { name: c } => out.extend_from_slice(&c.0.to_le_bytes()),
            Self::Jump { offset }
            | Self::JumpIfTrue { offset }
            | Self::JumpIfFalse { offset }
            | Self::JumpBackward { offset } => out.extend_from_slice(&offset.to_le_bytes()),
            Self::Call { argc } => out.extend_from_slice(&argc.to_le_bytes()),
            Self::CallFast { function: c, argc } | Self::Method { name: c, argc } => {
                out.extend_from_slice(&c.0.to_le_bytes());
                out.extend_from_slice(&argc.to_le_bytes());
            }
            Self::Array { len } | Self::Map { len } => out.extend_from_slice(&len.to_le_bytes()),
            Self::Store { slot } | Self::Load { slot } | Self::Inc { slot } => {
                out.extend_from_slice(&slot.0.to_le_bytes())
            }
            Self::Cast { to } => out.push(to.to_u8()),
            _ => {}
        }
    }

    pub fn encoded_size(&self) -> usize {
        self.opcode().size()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().name();
        match *self {
            Self::Jump { offset } | Self::JumpIfTrue { offset } | Self::JumpIfFalse { offset } => {
                write!(f, "{name} +{offset}")
            }
            Self::JumpBackward { offset } => write!(f, "{name} -{offset}"),
            Self::Call { argc } => write!(f, "{name} {argc}"),
            Self::CallFast { function: c, argc } | Self::Method { name: c, argc } => {
                write!(f, "{name} {c} {argc}")
            }
            Self::Array { len } | Self::Map { len } => write!(f, "{name} {len}"),
            Self::Cast { to } => write!(f, "{name} {}", to.name()),
            _ => match (self.constant(), self.slot()) {
                (Some(c), _) => write!(f, "{name} {c}"),
                (_, Some(slot)) => write!(f, "{name} {slot}"),
                _ => f.write_str(name),
            },
        }
    }
}
