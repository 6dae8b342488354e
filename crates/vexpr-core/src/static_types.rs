//! Static descriptor tables (zero runtime init).
//!
//! Hosts that know their data model at build time describe it with
//! `&'static` tables. Ids of host types start after the builtins, see
//! [`TypeId::custom`].

use crate::kind::{Kind, NumericKind};
use crate::{FieldRef, HostTypes, TypeId};

/// Struct member for static storage.
#[derive(Debug, Clone, Copy)]
pub struct StaticField {
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub ty: TypeId,
    pub embedded: bool,
}

impl StaticField {
    pub const fn new(name: &'static str, ty: TypeId) -> Self {
        Self {
            name,
            tag: None,
            ty,
            embedded: false,
        }
    }

    pub const fn tagged(name: &'static str, tag: &'static str, ty: TypeId) -> Self {
        Self {
            name,
            tag: Some(tag),
            ty,
            embedded: false,
        }
    }

    pub const fn embedded(name: &'static str, ty: TypeId) -> Self {
        Self {
            name,
            tag: None,
            ty,
            embedded: true,
        }
    }

    fn to_field_ref(&self) -> FieldRef<'static> {
        FieldRef {
            name: self.name,
            tag: self.tag,
            ty: self.ty,
            embedded: self.embedded,
        }
    }
}

/// Complete descriptor for static storage.
#[derive(Debug, Clone, Copy)]
pub struct StaticTypeInfo {
    pub name: &'static str,
    pub kind: Kind,
    pub element: Option<TypeId>,
    pub key: Option<TypeId>,
    pub fields: &'static [StaticField],
}

impl StaticTypeInfo {
    pub const fn scalar(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            element: None,
            key: None,
            fields: &[],
        }
    }

    pub const fn pointer(name: &'static str, element: TypeId) -> Self {
        Self {
            name,
            kind: Kind::Pointer,
            element: Some(element),
            key: None,
            fields: &[],
        }
    }

    pub const fn array(name: &'static str, element: TypeId) -> Self {
        Self {
            name,
            kind: Kind::Array,
            element: Some(element),
            key: None,
            fields: &[],
        }
    }

    pub const fn map(name: &'static str, key: TypeId, element: TypeId) -> Self {
        Self {
            name,
            kind: Kind::Map,
            element: Some(element),
            key: Some(key),
            fields: &[],
        }
    }

    pub const fn structure(name: &'static str, fields: &'static [StaticField]) -> Self {
        Self {
            name,
            kind: Kind::Struct,
            element: None,
            key: None,
            fields,
        }
    }
}

/// Builtin descriptors, indexed by their fixed [`TypeId`].
pub static BUILTIN_TYPES: [StaticTypeInfo; TypeId::BUILTIN_COUNT as usize] = [
    StaticTypeInfo::scalar("nil", Kind::Nil),
    StaticTypeInfo::scalar("bool", Kind::Bool),
    StaticTypeInfo::scalar("int", Kind::Numeric(NumericKind::Int)),
    StaticTypeInfo::scalar("float64", Kind::Numeric(NumericKind::Float64)),
    StaticTypeInfo::scalar("string", Kind::String),
    StaticTypeInfo::array("[]any", TypeId::ANY),
    StaticTypeInfo::map("map[string]any", TypeId::STRING, TypeId::ANY),
    StaticTypeInfo::scalar("any", Kind::Interface),
    StaticTypeInfo::scalar("time", Kind::Time),
    StaticTypeInfo::scalar("duration", Kind::Duration),
    StaticTypeInfo::scalar("error", Kind::Error),
];

/// Descriptor set with static storage.
///
/// `types[n]` is addressed as `TypeId::custom(n)`; builtins are served from
/// [`BUILTIN_TYPES`]. The table must be free of pointer cycles.
#[derive(Debug, Clone, Copy)]
pub struct StaticHostTypes {
    types: &'static [StaticTypeInfo],
}

impl StaticHostTypes {
    pub const fn new(types: &'static [StaticTypeInfo]) -> Self {
        Self { types }
    }

    /// Descriptor for an id, builtins included.
    pub fn get(&self, ty: TypeId) -> Option<&'static StaticTypeInfo> {
        let index = ty.index();
        match index.checked_sub(TypeId::BUILTIN_COUNT as usize) {
            None => BUILTIN_TYPES.get(index),
            Some(custom) => self.types.get(custom),
        }
    }

    /// Find a descriptor by name (linear scan, builtins first).
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        BUILTIN_TYPES
            .iter()
            .chain(self.types)
            .position(|info| info.name == name)
            .map(|i| TypeId::from_raw(i as u32))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl HostTypes for StaticHostTypes {
    fn type_count(&self) -> usize {
        BUILTIN_TYPES.len() + self.types.len()
    }

    fn kind(&self, ty: TypeId) -> Kind {
        self.ensure_type(ty).kind
    }

    fn name(&self, ty: TypeId) -> &str {
        self.ensure_type(ty).name
    }

    fn element(&self, ty: TypeId) -> Option<TypeId> {
        self.ensure_type(ty).element
    }

    fn key(&self, ty: TypeId) -> Option<TypeId> {
        self.ensure_type(ty).key
    }

    fn field_count(&self, ty: TypeId) -> usize {
        self.ensure_type(ty).fields.len()
    }

    fn field(&self, ty: TypeId, index: usize) -> Option<FieldRef<'_>> {
        self.ensure_type(ty).fields.get(index).map(StaticField::to_field_ref)
    }
}
