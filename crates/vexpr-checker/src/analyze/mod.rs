//! Static analysis primitives composed by the expression type checker.
//!
//! # Module Organization
//!
//! - `predicates`: kind classification with interface optimism
//! - `fields`: member lookup through tags and embedded structs
//! - `widening`: numeric rank and the result width of binary arithmetic
//! - `literals`: pushing an inferred width into integer literal subtrees

mod fields;
mod literals;
mod predicates;
mod widening;

#[cfg(test)]
mod literals_tests;

pub use fields::{FieldResolver, ResolveLimits, fetch_path, fetch_type};
pub use literals::{
    assign_default_literal_types, balance_literal_operands, default_literal_type,
    is_integer_or_arithmetic, set_type_for_integers,
};
pub use predicates::TypePredicates;
pub use widening::{arithmetic_weight, combined};
