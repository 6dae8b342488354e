//! Member resolution for `expr.field` access.
//!
//! Lookup order inside a struct: direct members by effective name, then
//! embedded members depth-first in declaration order. The walk uses an
//! explicit worklist so that self-embedding host types cannot overflow the
//! stack.

use std::collections::HashMap;

use vexpr_core::{HostTypes, Kind, TypeId};

/// Bounds for embedded-struct traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveLimits {
    pub(crate) max_embedding_depth: u32,
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self {
            max_embedding_depth: 32,
        }
    }
}

impl ResolveLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest embedded level that is searched. `0` disables promotion.
    pub fn max_embedding_depth(mut self, depth: u32) -> Self {
        self.max_embedding_depth = depth;
        self
    }

    pub fn get_max_embedding_depth(&self) -> u32 {
        self.max_embedding_depth
    }
}

/// Member resolver bound to one descriptor set.
pub struct FieldResolver<'h, H: HostTypes + ?Sized> {
    host: &'h H,
    limits: ResolveLimits,
}

impl<H: HostTypes + ?Sized> Clone for FieldResolver<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: HostTypes + ?Sized> Copy for FieldResolver<'_, H> {}

impl<'h, H: HostTypes + ?Sized> FieldResolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            limits: ResolveLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResolveLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ResolveLimits {
        self.limits
    }

    /// Static type of member `name` on `ty`.
    ///
    /// An interface resolves to `TypeId::ANY`: the access is deferred to run
    /// time. Returns `None` when the member does not exist or `ty` cannot
    /// have members.
    #[tracing::instrument(level = "trace", skip(self, ty), fields(ty = ?ty))]
    pub fn fetch_type(&self, ty: Option<TypeId>, name: &str) -> Option<TypeId> {
        let host = self.host;
        let mut expanded: HashMap<TypeId, u32> = HashMap::new();
        let mut stack: Vec<(TypeId, u32)> = Vec::new();
        if let Some(start) = host.dereference(ty) {
            stack.push((start, 0));
        }

        while let Some((current, depth)) = stack.pop() {
            let Some(current) = host.dereference(Some(current)) else {
                continue;
            };
            match host.kind(current) {
                Kind::Interface => return Some(TypeId::ANY),
                Kind::Struct => {}
                _ => continue,
            }
            // expanded before with at least this much depth budget left
            if let Some(&seen) = expanded.get(&current)
                && seen <= depth
            {
                tracing::debug!(
                    ty = host.name(current),
                    depth,
                    seen,
                    "embedded struct already searched, skipping"
                );
                continue;
            }
            expanded.insert(current, depth);

            if let Some(field) = host
                .fields(current)
                .find(|f| !f.embedded && f.effective_name() == name)
            {
                return Some(field.ty);
            }

            let embedded: Vec<TypeId> = host
                .fields(current)
                .filter(|f| f.embedded)
                .map(|f| f.ty)
                .collect();
            if embedded.is_empty() {
                continue;
            }
            if depth >= self.limits.max_embedding_depth {
                tracing::warn!(
                    ty = host.name(current),
                    limit = self.limits.max_embedding_depth,
                    "embedding depth limit reached, skipping promoted members"
                );
                continue;
            }
            // reversed so the first declared embedded member is searched first
            stack.extend(embedded.into_iter().rev().map(|e| (e, depth + 1)));
        }

        tracing::debug!(name, "member not found");
        None
    }

    /// Resolve a dotted member chain, e.g. `"Address.City"`.
    ///
    /// An empty path resolves to `ty` itself.
    pub fn fetch_path(&self, ty: Option<TypeId>, path: &str) -> Option<TypeId> {
        if path.is_empty() {
            return ty;
        }
        path.split('.')
            .try_fold(ty, |current, segment| {
                self.fetch_type(current, segment).map(Some)
            })
            .flatten()
    }
}

/// [`FieldResolver::fetch_type`] with default limits.
pub fn fetch_type<H: HostTypes + ?Sized>(host: &H, ty: Option<TypeId>, name: &str) -> Option<TypeId> {
    FieldResolver::new(host).fetch_type(ty, name)
}

/// [`FieldResolver::fetch_path`] with default limits.
pub fn fetch_path<H: HostTypes + ?Sized>(host: &H, ty: Option<TypeId>, path: &str) -> Option<TypeId> {
    FieldResolver::new(host).fetch_path(ty, path)
}
