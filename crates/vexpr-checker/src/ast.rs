//! Expression syntax tree and its type annotations.
//!
//! Nodes live in an arena and are addressed by `NodeId`. Static types are
//! kept out of the tree, in a `TypeSlots` side table keyed by the same ids,
//! so the tree stays immutable once parsed.

use vexpr_core::TypeId;

/// Stable handle to a node within one `Ast`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Prefix operators.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `not` / `!`
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "not",
        }
    }

    /// Sign operators keep a literal arithmetic chain intact.
    pub fn is_sign(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}

/// Infix operators.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    In,
    Matches,
    Contains,
    StartsWith,
    EndsWith,
    Range,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
            Self::In => "in",
            Self::Matches => "matches",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Range => "..",
        }
    }

    /// The four operators through which literal widths propagate.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

/// Node shapes produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Identifier(String),
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    /// `object.name`
    Member {
        object: NodeId,
        name: String,
    },
}

impl NodeKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Nil | Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::String(_)
        )
    }
}

/// Arena of expression nodes.
///
/// Children are always pushed before their parents, so ids of children are
/// smaller than the id of the node that owns them.
#[derive(Clone, Debug, Default)]
pub struct Ast {
    nodes: Vec<NodeKind>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(kind);
        id
    }

    pub fn nil(&mut self) -> NodeId {
        self.push(NodeKind::Nil)
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.push(NodeKind::Bool(value))
    }

    pub fn integer(&mut self, value: i64) -> NodeId {
        self.push(NodeKind::Integer(value))
    }

    pub fn float(&mut self, value: f64) -> NodeId {
        self.push(NodeKind::Float(value))
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeKind::String(value.into()))
    }

    pub fn identifier(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Identifier(name.into()))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Binary { op, left, right })
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Call { callee, args })
    }

    pub fn member(&mut self, object: NodeId, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Member {
            object,
            name: name.into(),
        })
    }

    /// Panics if `id` belongs to another tree.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index())
    }

    /// Direct children in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::Call { callee, args } => {
                let mut out = Vec::with_capacity(args.len() + 1);
                out.push(*callee);
                out.extend_from_slice(args);
                out
            }
            NodeKind::Member { object, .. } => vec![*object],
            _ => Vec::new(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Static type of each node, keyed by `NodeId`.
///
/// Once set by the checker, a slot is the authoritative type of its node
/// for the rest of compilation. Writing the same type again is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSlots {
    slots: Vec<Option<TypeId>>,
}

impl TypeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty slots sized for every node of `ast`.
    pub fn for_ast(ast: &Ast) -> Self {
        Self {
            slots: vec![None; ast.len()],
        }
    }

    pub fn get(&self, id: NodeId) -> Option<TypeId> {
        self.slots.get(id.index()).copied().flatten()
    }

    /// Record the type of a node, returning the previous annotation.
    pub fn set(&mut self, id: NodeId, ty: TypeId) -> Option<TypeId> {
        let index = id.index();
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index].replace(ty)
    }

    pub fn is_annotated(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Annotated nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, TypeId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, ty)| ty.map(|ty| (NodeId(i as u32), ty)))
    }
}
