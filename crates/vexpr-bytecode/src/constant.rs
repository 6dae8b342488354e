//! Constant pool entries and pool/slot handles.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Index into a program's constant pool.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstId(pub u32);

impl ConstId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ConstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Index into a frame's variable slots.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Compile-time value referenced by an instruction.
///
/// Equality and hashing compare floats by bit pattern, so every constant can
/// key a deduplicating pool (`NaN` equals itself, `0.0` differs from `-0.0`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Int(i64),
    Float(f64),
    /// Literal string, also used for environment, property and method names.
    String(String),
    /// Regex source for `MatchesConst`.
    Regex(String),
    /// Precomputed field index chain for `FetchEnvFast`.
    FieldPath(Vec<u32>),
    /// Statically resolved callee for `CallFast`.
    Function { index: u32, arity: u16 },
}

impl Constant {
    /// Short kind label used in diagnostics and dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Regex(_) => "regex",
            Self::FieldPath(_) => "path",
            Self::Function { .. } => "func",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a == b,
            (Self::FieldPath(a), Self::FieldPath(b)) => a == b,
            (
                Self::Function { index: i, arity: a },
                Self::Function {
                    index: j,
                    arity: b,
                },
            ) => i == j && a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::String(s) | Self::Regex(s) => s.hash(state),
            Self::FieldPath(path) => path.hash(state),
            Self::Function { index, arity } => {
                index.hash(state);
                arity.hash(state);
            }
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Regex(s) => write!(f, "/{s}/"),
            Self::FieldPath(path) => {
                let parts: Vec<String> = path.iter().map(u32::to_string).collect();
                write!(f, "[{}]", parts.join("."))
            }
            Self::Function { index, arity } => write!(f, "fn#{index}/{arity}"),
        }
    }
}
