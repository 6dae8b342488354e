//! vexpr checker primitives: static type resolution over host types.
//!
//! This crate provides the pieces an expression type checker composes to
//! accept or reject an expression and to annotate its nodes:
//! - `ast` - syntax tree arena and the node type side table
//! - `analyze` - type predicates, member resolution, numeric widening,
//!   literal width propagation
//!
//! Operator legality and diagnostic formatting belong to the caller. Nothing
//! here fails: absence is reported as `None`/`false` so the caller can attach
//! a positioned diagnostic.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod ast;


pub use analyze::{
    FieldResolver, ResolveLimits, TypePredicates, arithmetic_weight, assign_default_literal_types,
    balance_literal_operands, combined, default_literal_type, fetch_path, fetch_type,
    is_integer_or_arithmetic, set_type_for_integers,
};
pub use ast::{Ast, BinaryOp, NodeId, NodeKind, TypeSlots, UnaryOp};
pub use vexpr_core::{HostTypes, Kind, NumericKind, TypeId};
