//! Kind classification over host type descriptors.
//!
//! Every predicate dereferences first. An `Interface` descriptor is an open
//! type whose runtime kind is unknown, so it satisfies every predicate except
//! `is_duration`, `is_struct` and `is_func`. `None` (nil) satisfies none of
//! them; only `is_comparable` accepts it.

use vexpr_core::{HostTypes, Kind, TypeId};

/// Classification queries, available on every [`HostTypes`].
pub trait TypePredicates: HostTypes {
    /// Kind after stripping pointers, `None` for nil.
    fn deref_kind(&self, ty: Option<TypeId>) -> Option<Kind> {
        self.dereference(ty).map(|ty| self.kind(ty))
    }

    fn is_interface(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Interface))
    }

    fn is_integer(&self, ty: Option<TypeId>) -> bool {
        match self.deref_kind(ty) {
            Some(Kind::Numeric(n)) => n.is_integer(),
            Some(Kind::Interface) => true,
            _ => false,
        }
    }

    fn is_float(&self, ty: Option<TypeId>) -> bool {
        match self.deref_kind(ty) {
            Some(Kind::Numeric(n)) => n.is_float(),
            Some(Kind::Interface) => true,
            _ => false,
        }
    }

    fn is_number(&self, ty: Option<TypeId>) -> bool {
        self.is_integer(ty) || self.is_float(ty)
    }

    fn is_time(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Time | Kind::Interface))
    }

    /// No interface fallback.
    fn is_duration(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Duration))
    }

    fn is_bool(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Bool | Kind::Interface))
    }

    fn is_string(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::String | Kind::Interface))
    }

    fn is_array(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Array | Kind::Interface))
    }

    fn is_map(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Map | Kind::Interface))
    }

    fn is_struct(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Struct))
    }

    fn is_func(&self, ty: Option<TypeId>) -> bool {
        matches!(self.deref_kind(ty), Some(Kind::Func))
    }

    /// Gate for `==` / `!=` between two static types.
    ///
    /// Accepts nil on either side, identical kinds, or an interface on either
    /// side. Numeric kinds compare by exact width.
    fn is_comparable(&self, left: Option<TypeId>, right: Option<TypeId>) -> bool {
        match (self.deref_kind(left), self.deref_kind(right)) {
            (None, _) | (_, None) => true,
            (Some(Kind::Interface), _) | (_, Some(Kind::Interface)) => true,
            (Some(l), Some(r)) => l == r,
        }
    }
}

impl<H: HostTypes + ?Sized> TypePredicates for H {}
