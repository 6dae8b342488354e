//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::registry::TypeInfo;
use crate::{StaticHostTypes, StaticTypeInfo, TypeId, TypeRegistry};

impl StaticHostTypes {
    pub(crate) fn ensure_type(&self, ty: TypeId) -> &'static StaticTypeInfo {
        self.get(ty).unwrap_or_else(|| {
            panic!(
                "HostTypes: type id {} not found \
                 (ids must come from the same descriptor set)",
                ty.as_u32()
            )
        })
    }
}

impl TypeRegistry {
    pub(crate) fn ensure_type(&self, ty: TypeId) -> &TypeInfo {
        self.info(ty).unwrap_or_else(|| {
            panic!(
                "HostTypes: type id {} not found \
                 (ids must come from the same descriptor set)",
                ty.as_u32()
            )
        })
    }
}

/// Indirection walk exceeded the descriptor count.
pub(crate) fn indirection_cycle(name: &str) -> ! {
    panic!("HostTypes: pointer cycle through `{name}` (host type sets must be acyclic)")
}
