//! Numeric widening for binary arithmetic.

use vexpr_core::{HostTypes, TypeId};

/// Rank of a descriptor's own kind (no dereference). Zero for non-numeric.
pub fn arithmetic_weight<H: HostTypes + ?Sized>(host: &H, ty: TypeId) -> u8 {
    host.kind(ty).arithmetic_weight()
}

/// Result width of a binary numeric operation over `a` and `b`.
///
/// Returns `a` when it ranks strictly higher, otherwise `b`; on a tie the
/// second operand wins.
pub fn combined<H: HostTypes + ?Sized>(host: &H, a: TypeId, b: TypeId) -> TypeId {
    if arithmetic_weight(host, a) > arithmetic_weight(host, b) {
        a
    } else {
        b
    }
}
