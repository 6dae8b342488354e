//! Canonical host type kinds.
//!
//! `Kind` is the coarse category the checker classifies by. Numeric kinds
//! carry their width so widening and casts can name an exact target.

use serde::{Deserialize, Serialize};

/// Numeric kinds, in arithmetic-weight order.
///
/// Native-width kinds (`Uint`, `Int`) rank below the fixed-width kinds of the
/// same signedness; every unsigned kind ranks below every signed kind, and
/// floats rank above all integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NumericKind {
    Uint = 0,
    Uint8 = 1,
    Uint16 = 2,
    Uint32 = 3,
    Uint64 = 4,
    Int = 5,
    Int8 = 6,
    Int16 = 7,
    Int32 = 8,
    Int64 = 9,
    Float32 = 10,
    Float64 = 11,
}

impl NumericKind {
    /// Every numeric kind, lowest weight first.
    pub const ALL: [Self; 12] = [
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
    ];

    /// Convert from raw discriminant.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Arithmetic weight: 1 for `Uint` up to 12 for `Float64`.
    ///
    /// Zero is reserved for non-numeric kinds.
    pub fn weight(self) -> u8 {
        self as u8 + 1
    }

    pub fn is_integer(self) -> bool {
        !self.is_float()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn is_signed(self) -> bool {
        !matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }

    /// Bit width. Native kinds are 64 bits wide.
    pub fn bits(self) -> u32 {
        match self {
            Self::Uint8 | Self::Int8 => 8,
            Self::Uint16 | Self::Int16 => 16,
            Self::Uint32 | Self::Int32 | Self::Float32 => 32,
            Self::Uint | Self::Uint64 | Self::Int | Self::Int64 | Self::Float64 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Semantic kind of a host type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    /// Type of the `nil` literal.
    Nil,
    Bool,
    Numeric(NumericKind),
    String,
    /// Array or slice.
    Array,
    Map,
    Struct,
    Func,
    /// Indirection layer, stripped by `dereference`.
    Pointer,
    /// Open/dynamic type whose runtime kind is unknown statically.
    Interface,
    Time,
    Duration,
    Error,
}

impl Kind {
    /// Arithmetic weight used by numeric widening. Non-numeric kinds weigh 0.
    pub fn arithmetic_weight(self) -> u8 {
        match self {
            Self::Numeric(n) => n.weight(),
            _ => 0,
        }
    }

    pub fn numeric(self) -> Option<NumericKind> {
        match self {
            Self::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Whether descriptors of this kind carry an element type.
    pub fn has_element(self) -> bool {
        matches!(self, Self::Pointer | Self::Array | Self::Map)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Numeric(n) => n.name(),
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Struct => "struct",
            Self::Func => "func",
            Self::Pointer => "pointer",
            Self::Interface => "interface",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "nil" => Self::Nil,
            "bool" => Self::Bool,
            "string" => Self::String,
            "array" => Self::Array,
            "map" => Self::Map,
            "struct" => Self::Struct,
            "func" => Self::Func,
            "pointer" => Self::Pointer,
            "interface" => Self::Interface,
            "time" => Self::Time,
            "duration" => Self::Duration,
            "error" => Self::Error,
            _ => return NumericKind::from_name(name).map(Self::Numeric),
        };
        Some(kind)
    }
}
