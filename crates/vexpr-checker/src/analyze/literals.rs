//! Width propagation into integer literal subtrees.
//!
//! A literal chain is an integer literal, a sign operator over a literal
//! chain, or `+ - * /` over two literal chains. Any other node ends the
//! chain.

use vexpr_core::{HostTypes, TypeId};

use crate::ast::{Ast, NodeId, NodeKind, TypeSlots};

/// Whether `node` is a literal chain all the way down.
pub fn is_integer_or_arithmetic(ast: &Ast, node: NodeId) -> bool {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        match ast.kind(id) {
            NodeKind::Integer(_) => {}
            NodeKind::Unary { op, operand } if op.is_sign() => stack.push(*operand),
            NodeKind::Binary { op, left, right } if op.is_arithmetic() => {
                stack.push(*right);
                stack.push(*left);
            }
            _ => return false,
        }
    }
    true
}

/// Annotate every integer literal reachable from `node` through the chain
/// operators with `ty`.
///
/// Stops at any other node kind, so `f(2) + 3` annotates `3` only. Returns
/// the number of literals annotated.
#[tracing::instrument(level = "trace", skip(ast, slots))]
pub fn set_type_for_integers(
    ast: &Ast,
    slots: &mut TypeSlots,
    node: NodeId,
    ty: TypeId,
) -> usize {
    let mut annotated = 0;
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        match ast.kind(id) {
            NodeKind::Integer(_) => {
                slots.set(id, ty);
                annotated += 1;
            }
            NodeKind::Unary { op, operand } if op.is_sign() => stack.push(*operand),
            NodeKind::Binary { op, left, right } if op.is_arithmetic() => {
                stack.push(*right);
                stack.push(*left);
            }
            _ => {}
        }
    }
    annotated
}

/// Fix the width of a literal operand from its typed sibling.
///
/// If exactly one side of a binary operator is a literal chain and the other
/// side is annotated with a concrete numeric type, that type is pushed into
/// the literal side. Returns whether anything was annotated.
pub fn balance_literal_operands<H: HostTypes + ?Sized>(
    ast: &Ast,
    slots: &mut TypeSlots,
    host: &H,
    left: NodeId,
    right: NodeId,
) -> bool {
    adopt_width(ast, slots, host, left, right) || adopt_width(ast, slots, host, right, left)
}

fn adopt_width<H: HostTypes + ?Sized>(
    ast: &Ast,
    slots: &mut TypeSlots,
    host: &H,
    literal: NodeId,
    typed: NodeId,
) -> bool {
    if !is_integer_or_arithmetic(ast, literal) || is_integer_or_arithmetic(ast, typed) {
        return false;
    }
    let Some(ty) = host.dereference(slots.get(typed)) else {
        return false;
    };
    if host.kind(ty).numeric().is_none() {
        return false;
    }
    tracing::debug!(width = host.name(ty), "literal operand adopts sibling width");
    set_type_for_integers(ast, slots, literal, ty) > 0
}

/// Default type of a literal node, `None` for non-literals.
pub fn default_literal_type(kind: &NodeKind) -> Option<TypeId> {
    match kind {
        NodeKind::Nil => Some(TypeId::NIL),
        NodeKind::Bool(_) => Some(TypeId::BOOL),
        NodeKind::Integer(_) => Some(TypeId::INT),
        NodeKind::Float(_) => Some(TypeId::FLOAT64),
        NodeKind::String(_) => Some(TypeId::STRING),
        _ => None,
    }
}

/// Annotate every literal not yet annotated with its default type.
///
/// Literals that already carry a width keep it. Returns the number of nodes
/// annotated.
pub fn assign_default_literal_types(ast: &Ast, slots: &mut TypeSlots) -> usize {
    let mut annotated = 0;
    for id in ast.ids() {
        if slots.is_annotated(id) {
            continue;
        }
        if let Some(ty) = default_literal_type(ast.kind(id)) {
            slots.set(id, ty);
            annotated += 1;
        }
    }
    annotated
}
