//! The closed opcode catalog.
//!
//! Discriminants are the wire encoding. The order is fixed: new opcodes may
//! only be inserted before [`Opcode::Sentinel`], which marks the catalog
//! length and is never part of an executable program.

use std::fmt;

/// Operation codes, in catalog order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Push = 0,
    Pop,
    Rot,
    Fetch,
    FetchEnv,
    FetchEnvFast,
    True,
    False,
    Nil,
    Negate,
    Not,
    Equal,
    EqualInt,
    EqualString,
    Jump,
    JumpIfTrue,
    JumpIfFalse,
    JumpBackward,
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
    MatchesConst,
    Contains,
    StartsWith,
    EndsWith,
    Slice,
    Property,
    Call,
    CallFast,
    Method,
    Array,
    Map,
    Len,
    Cast,
    Store,
    Load,
    Inc,
    BeginScope,
    EndScope,
    /// Catalog length marker. Must stay last.
    Sentinel,
}

/// Number of executable opcodes (everything before the sentinel).
pub const OPCODE_COUNT: usize = Opcode::Sentinel as usize;

/// Coarse grouping used by listings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Stack,
    Fetch,
    Comparison,
    Ordering,
    Arithmetic,
    Membership,
    Collection,
    Invocation,
    Casting,
    ControlFlow,
    Variables,
    Scope,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Fetch => "fetch",
            Self::Comparison => "comparison",
            Self::Ordering => "ordering",
            Self::Arithmetic => "arithmetic",
            Self::Membership => "membership",
            Self::Collection => "collection",
            Self::Invocation => "invocation",
            Self::Casting => "casting",
            Self::ControlFlow => "control",
            Self::Variables => "variables",
            Self::Scope => "scope",
        }
    }
}

/// Operand layout following the opcode byte (little-endian).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operands {
    None,
    /// u32 constant pool index
    Const,
    /// u32 jump distance
    Offset,
    /// u16 argument count
    Argc,
    /// u32 constant pool index, u16 argument count
    ConstArgc,
    /// u32 element count
    Count,
    /// u32 variable slot
    Slot,
    /// u8 numeric kind
    Kind,
}

impl Operands {
    /// Encoded operand bytes.
    pub fn size(self) -> usize {
        match self {
            Self::None => 0,
            Self::Kind => 1,
            Self::Argc => 2,
            Self::Const | Self::Offset | Self::Count | Self::Slot => 4,
            Self::ConstArgc => 6,
        }
    }
}

/// Values popped and pushed by one instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StackEffect {
    Fixed { pops: u8, pushes: u8 },
    /// `argc + extra` popped, one result pushed.
    Args { extra: u8 },
    /// `per * n` popped, one collection pushed.
    Elements { per: u8 },
}

impl fmt::Display for StackEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fixed { pops, pushes } => write!(f, "{pops}→{pushes}"),
            Self::Args { extra: 0 } => write!(f, "argc→1"),
            Self::Args { extra } => write!(f, "argc+{extra}→1"),
            Self::Elements { per: 1 } => write!(f, "n→1"),
            Self::Elements { per } => write!(f, "{per}n→1"),
        }
    }
}

const fn fixed(pops: u8, pushes: u8) -> StackEffect {
    StackEffect::Fixed { pops, pushes }
}

impl Opcode {
    /// Every executable opcode, in catalog order.
    pub const ALL: [Self; OPCODE_COUNT] = [
        Self::Push,
        Self::Pop,
        Self::Rot,
        Self::Fetch,
        Self::FetchEnv,
        Self::FetchEnvFast,
        Self::True,
        Self::False,
        Self::Nil,
        Self::Negate,
        Self::Not,
        Self::Equal,
        Self::EqualInt,
        Self::EqualString,
        Self::Jump,
        Self::JumpIfTrue,
        Self::JumpIfFalse,
        Self::JumpBackward,
        Self::In,
        Self::Less,
        Self::More,
        Self::LessOrEqual,
        Self::MoreOrEqual,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::Exponent,
        Self::Range,
        Self::Matches,
        Self::MatchesConst,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Slice,
        Self::Property,
        Self::Call,
        Self::CallFast,
        Self::Method,
        Self::Array,
        Self::Map,
        Self::Len,
        Self::Cast,
        Self::Store,
        Self::Load,
        Self::Inc,
        Self::BeginScope,
        Self::EndScope,
    ];

    /// Decode a wire byte. The sentinel decodes (so callers can reject it
    /// with a precise error); bytes past it do not.
    pub fn from_u8(b: u8) -> Option<Self> {
        match Self::ALL.get(b as usize) {
            Some(&op) => Some(op),
            None if b == Self::Sentinel as u8 => Some(Self::Sentinel),
            None => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn is_sentinel(self) -> bool {
        self == Self::Sentinel
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::Pop => "Pop",
            Self::Rot => "Rot",
            Self::Fetch => "Fetch",
            Self::FetchEnv => "FetchEnv",
            Self::FetchEnvFast => "FetchEnvFast",
            Self::True => "True",
            Self::False => "False",
            Self::Nil => "Nil",
            Self::Negate => "Negate",
            Self::Not => "Not",
            Self::Equal => "Equal",
            Self::EqualInt => "EqualInt",
            Self::EqualString => "EqualString",
            Self::Jump => "Jump",
            Self::JumpIfTrue => "JumpIfTrue",
            Self::JumpIfFalse => "JumpIfFalse",
            Self::JumpBackward => "JumpBackward",
            Self::In => "In",
            Self::Less => "Less",
            Self::More => "More",
            Self::LessOrEqual => "LessOrEqual",
            Self::MoreOrEqual => "MoreOrEqual",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Modulo => "Modulo",
            Self::Exponent => "Exponent",
            Self::Range => "Range",
            Self::Matches => "Matches",
            Self::MatchesConst => "MatchesConst",
            Self::Contains => "Contains",
            Self::StartsWith => "StartsWith",
            Self::EndsWith => "EndsWith",
            Self::Slice => "Slice",
            Self::Property => "Property",
            Self::Call => "Call",
            Self::CallFast => "CallFast",
            Self::Method => "Method",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Len => "Len",
            Self::Cast => "Cast",
            Self::Store => "Store",
            Self::Load => "Load",
            Self::Inc => "Inc",
            Self::BeginScope => "BeginScope",
            Self::EndScope => "EndScope",
            Self::Sentinel => "Sentinel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn category(self) -> Category {
        use Opcode::*;
        match self {
            Push | Pop | Rot | Sentinel => Category::Stack,
            Fetch | FetchEnv | FetchEnvFast | True | False | Nil => Category::Fetch,
            Negate | Not => Category::Arithmetic,
            Equal | EqualInt | EqualString => Category::Comparison,
            Less | More | LessOrEqual | MoreOrEqual => Category::Ordering,
            Add | Subtract | Multiply | Divide | Modulo | Exponent | Range => Category::Arithmetic,
            In | Matches | MatchesConst | Contains | StartsWith | EndsWith => Category::Membership,
            Slice | Property | Array | Map | Len => Category::Collection,
            Call | CallFast | Method => Category::Invocation,
            Cast => Category::Casting,
            Jump | JumpIfTrue | JumpIfFalse | JumpBackward => Category::ControlFlow,
            Store | Load | Inc => Category::Variables,
            BeginScope | EndScope => Category::Scope,
        }
    }

    pub fn operands(self) -> Operands {
        use Opcode::*;
        match self {
            Push | FetchEnv | FetchEnvFast | MatchesConst | Property => Operands::Const,
            Jump | JumpIfTrue | JumpIfFalse | JumpBackward => Operands::Offset,
            Call => Operands::Argc,
            CallFast | Method => Operands::ConstArgc,
            Array | Map => Operands::Count,
            Store | Load | Inc => Operands::Slot,
            Cast => Operands::Kind,
            _ => Operands::None,
        }
    }

    /// Encoded size of an instruction with this opcode.
    pub fn size(self) -> usize {
        1 + self.operands().size()
    }

    pub fn stack_effect(self) -> StackEffect {
        use Opcode::*;
        match self {
            Push | FetchEnv | FetchEnvFast | True | False | Nil | Load => fixed(0, 1),
            Pop | Store | JumpIfTrue | JumpIfFalse => fixed(1, 0),
            Rot => fixed(2, 2),
            Fetch | Equal | EqualInt | EqualString | In | Less | More | LessOrEqual
            | MoreOrEqual | Add | Subtract | Multiply | Divide | Modulo | Exponent | Range
            | Matches | Contains | StartsWith | EndsWith => fixed(2, 1),
            Negate | Not | MatchesConst | Property | Len | Cast => fixed(1, 1),
            Slice => fixed(3, 1),
            Call | Method => StackEffect::Args { extra: 1 },
            CallFast => StackEffect::Args { extra: 0 },
            Array => StackEffect::Elements { per: 1 },
            Map => StackEffect::Elements { per: 2 },
            Jump | JumpBackward | Inc | BeginScope | EndScope | Sentinel => fixed(0, 0),
        }
    }

    pub fn is_jump(self) -> bool {
        self.category() == Category::ControlFlow
    }

    /// Unconditional transfers never fall through to the next instruction.
    pub fn is_unconditional_jump(self) -> bool {
        matches!(self, Self::Jump | Self::JumpBackward)
    }

    /// Generic opcode that stays correct wherever this fast one is used.
    pub fn generic(self) -> Option<Self> {
        match self {
            Self::FetchEnvFast => Some(Self::FetchEnv),
            Self::EqualInt | Self::EqualString => Some(Self::Equal),
            Self::MatchesConst => Some(Self::Matches),
            Self::CallFast => Some(Self::Call),
            _ => None,
        }
    }

    pub fn is_fast(self) -> bool {
        self.generic().is_some()
    }

    /// Static information the code generator must have proven before
    /// choosing this opcode over its generic counterpart.
    pub fn precondition(self) -> Option<&'static str> {
        match self {
            Self::FetchEnvFast => Some("environment address resolved at compile time"),
            Self::EqualInt => Some("both operands statically integer"),
            Self::EqualString => Some("both operands statically string"),
            Self::MatchesConst => Some("pattern is a valid constant regex"),
            Self::CallFast => Some("callee resolved with matching arity"),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
