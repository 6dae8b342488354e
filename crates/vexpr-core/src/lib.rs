#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Host type descriptors for vexpr.
//!
//! The embedding host describes its data model once, at environment setup.
//! Every compilation afterwards only reads it, so a descriptor set can be
//! shared across threads without locking.
//!
//! Two layers:
//! - **Deserialization layer**: JSON documents naming host types (`RawDocument`)
//! - **Analysis layer**: the `HostTypes` capability queried by the checker
//!
//! Two implementations:
//! - **Dynamic** (`TypeRegistry`): heap-allocated, built at runtime
//! - **Static** (`StaticHostTypes`): `&'static` tables, zero runtime init

mod colors;
mod invariants;
mod kind;
mod registry;
mod static_types;

#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod static_types_tests;

pub use colors::Colors;
pub use kind::{Kind, NumericKind};
pub use registry::{
    FieldInfo, RawDocument, RawField, RawType, RegistryError, TypeRegistry, TypeRegistryBuilder,
    parse_type_document,
};
pub use static_types::{BUILTIN_TYPES, StaticField, StaticHostTypes, StaticTypeInfo};

// ============================================================================
// Common Types
// ============================================================================

/// Handle to one host type descriptor.
///
/// Ids below [`TypeId::BUILTIN_COUNT`] are the builtin descriptors every
/// descriptor set carries at fixed positions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    /// Type of the `nil` literal. Treated as "no type" by every query.
    pub const NIL: Self = Self(0);
    pub const BOOL: Self = Self(1);
    /// Native signed integer, the default width of integer literals.
    pub const INT: Self = Self(2);
    /// Default width of float literals.
    pub const FLOAT64: Self = Self(3);
    pub const STRING: Self = Self(4);
    /// `[]any`
    pub const ARRAY: Self = Self(5);
    /// `map[string]any`
    pub const MAP: Self = Self(6);
    /// Generic dynamic descriptor (open interface).
    pub const ANY: Self = Self(7);
    pub const TIME: Self = Self(8);
    pub const DURATION: Self = Self(9);
    pub const ERROR: Self = Self(10);

    /// Number of builtin descriptors.
    pub const BUILTIN_COUNT: u32 = 11;

    /// Create from a raw index. Use only for deserialization and static tables.
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Id of the `n`-th host-defined (non-builtin) descriptor.
    #[inline]
    pub const fn custom(n: u32) -> Self {
        Self(Self::BUILTIN_COUNT + n)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

/// Borrowed view of one struct member.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FieldRef<'a> {
    /// Declared field identifier.
    pub name: &'a str,
    /// External name override. Replaces `name` for lookups when non-empty.
    pub tag: Option<&'a str>,
    pub ty: TypeId,
    /// Anonymous member whose own fields are promoted into the parent.
    pub embedded: bool,
}

impl<'a> FieldRef<'a> {
    /// Name used for member lookup: the tag override if present, else the identifier.
    pub fn effective_name(&self) -> &'a str {
        match self.tag {
            Some(tag) if !tag.is_empty() => tag,
            _ => self.name,
        }
    }
}

// ============================================================================
// HostTypes Trait
// ============================================================================

/// Read-only capability over a set of host type descriptors.
///
/// Provides exactly what static checking needs:
/// - Kind classification
/// - Element (pointee, array element, map value) and map key lookup
/// - Ordered struct member enumeration
///
/// Every method must be a pure read; implementations are shared by
/// concurrent compilations.
pub trait HostTypes {
    /// Number of descriptors, builtins included.
    fn type_count(&self) -> usize;

    fn kind(&self, ty: TypeId) -> Kind;
    fn name(&self, ty: TypeId) -> &str;

    /// Pointee for pointers, element for arrays, value type for maps.
    fn element(&self, ty: TypeId) -> Option<TypeId>;
    /// Key type for maps.
    fn key(&self, ty: TypeId) -> Option<TypeId>;

    fn field_count(&self, ty: TypeId) -> usize;
    fn field(&self, ty: TypeId, index: usize) -> Option<FieldRef<'_>>;

    /// Struct members in declaration order. Empty for non-struct kinds.
    fn fields(&self, ty: TypeId) -> Fields<'_, Self> {
        Fields {
            host: self,
            ty,
            next: 0,
            count: self.field_count(ty),
        }
    }

    /// Strip every pointer layer.
    ///
    /// `None` and `nil`-kind descriptors dereference to `None`. The walk is
    /// bounded by the descriptor count; exceeding it means the host type set
    /// contains an indirection cycle, which is a fatal invariant violation.
    fn dereference(&self, ty: Option<TypeId>) -> Option<TypeId> {
        let mut current = ty?;
        let mut layers = 0usize;
        loop {
            match self.kind(current) {
                Kind::Nil => return None,
                Kind::Pointer => {
                    layers += 1;
                    if layers > self.type_count() {
                        invariants::indirection_cycle(self.name(current));
                    }
                    current = self.element(current)?;
                }
                _ => return Some(current),
            }
        }
    }
}

impl<T: HostTypes + ?Sized> HostTypes for &T {
    fn type_count(&self) -> usize {
        (*self).type_count()
    }
    fn kind(&self, ty: TypeId) -> Kind {
        (*self).kind(ty)
    }
    fn name(&self, ty: TypeId) -> &str {
        (*self).name(ty)
    }
    fn element(&self, ty: TypeId) -> Option<TypeId> {
        (*self).element(ty)
    }
    fn key(&self, ty: TypeId) -> Option<TypeId> {
        (*self).key(ty)
    }
    fn field_count(&self, ty: TypeId) -> usize {
        (*self).field_count(ty)
    }
    fn field(&self, ty: TypeId, index: usize) -> Option<FieldRef<'_>> {
        (*self).field(ty, index)
    }
}

/// Iterator over the members of a struct descriptor.
pub struct Fields<'a, H: HostTypes + ?Sized> {
    host: &'a H,
    ty: TypeId,
    next: usize,
    count: usize,
}

impl<'a, H: HostTypes + ?Sized> Iterator for Fields<'a, H> {
    type Item = FieldRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let field = self.host.field(self.ty, self.next);
        self.next += 1;
        field
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.count - self.next;
        (rest, Some(rest))
    }
}

impl<H: HostTypes + ?Sized> ExactSizeIterator for Fields<'_, H> {}
