//! Runtime-built descriptor sets.
//!
//! `TypeRegistry` is the heap-allocated implementation of [`HostTypes`],
//! assembled once at environment setup through [`TypeRegistryBuilder`] or
//! loaded from a JSON type document.

use indexmap::IndexMap;

use crate::kind::{Kind, NumericKind};
use crate::static_types::BUILTIN_TYPES;
use crate::{FieldRef, HostTypes, TypeId};

// ============================================================================
// Deserialization Layer
// ============================================================================

/// Raw type document: a list of named host types.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawDocument {
    pub types: Vec<RawType>,
}

/// Raw type definition. Type references are names; `*T` and `[]T` build
/// pointer and array types on the fly.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawType {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// Raw struct member.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub embedded: bool,
}

/// Parse a JSON type document.
pub fn parse_type_document(json: &str) -> Result<RawDocument, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while assembling a descriptor set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate type name `{0}`")]
    DuplicateType(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("type id {0} does not belong to this registry")]
    UnknownTypeId(u32),

    #[error("unknown kind `{kind}` for type `{name}`")]
    UnknownKind { name: String, kind: String },

    #[error("type `{0}` is not a struct")]
    NotAStruct(String),

    #[error("type `{0}` requires an element type")]
    MissingElement(String),

    #[error("map type `{0}` requires a key type")]
    MissingKey(String),

    #[error("pointer cycle through `{0}`")]
    PointerCycle(String),

    #[error("invalid type document: {0}")]
    Document(String),
}

// ============================================================================
// Analysis Layer
// ============================================================================

/// Struct member owned by a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub tag: Option<String>,
    pub ty: TypeId,
    pub embedded: bool,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            tag: None,
            ty,
            embedded: false,
        }
    }

    pub fn embedded(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            embedded: true,
            ..Self::new(name, ty)
        }
    }

    /// Set the external name override.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef {
            name: &self.name,
            tag: self.tag.as_deref(),
            ty: self.ty,
            embedded: self.embedded,
        }
    }
}

/// Complete descriptor information.
#[derive(Debug, Clone)]
pub(crate) struct TypeInfo {
    pub(crate) name: String,
    pub(crate) kind: Kind,
    pub(crate) element: Option<TypeId>,
    pub(crate) key: Option<TypeId>,
    pub(crate) fields: Vec<FieldInfo>,
}

impl TypeInfo {
    fn new(name: String, kind: Kind) -> Self {
        Self {
            name,
            kind,
            element: None,
            key: None,
            fields: Vec::new(),
        }
    }
}

/// Descriptor set with heap storage. Immutable once built.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeInfo>,
    by_name: IndexMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Load a registry from a JSON type document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let doc = parse_type_document(json).map_err(|e| RegistryError::Document(e.to_string()))?;
        let mut builder = TypeRegistryBuilder::new();
        builder.load_document(&doc)?;
        builder.build()
    }

    pub(crate) fn info(&self, ty: TypeId) -> Option<&TypeInfo> {
        self.types.get(ty.index())
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// All descriptor ids in registration order, builtins first.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.by_name.values().copied()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let builder = TypeRegistryBuilder::new();
        Self {
            types: builder.types,
            by_name: builder.by_name,
        }
    }
}

impl HostTypes for TypeRegistry {
    fn type_count(&self) -> usize {
        self.types.len()
    }

    fn kind(&self, ty: TypeId) -> Kind {
        self.ensure_type(ty).kind
    }

    fn name(&self, ty: TypeId) -> &str {
        &self.ensure_type(ty).name
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
        self.ensure_type(ty).fields.get(index).map(FieldInfo::to_field_ref)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental registry construction.
///
/// Named types can be declared before their element or fields are known,
/// which allows recursive structs. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct TypeRegistryBuilder {
    types: Vec<TypeInfo>,
    by_name: IndexMap<String, TypeId>,
}

impl Default for TypeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistryBuilder {
    /// Create a builder seeded with the builtin descriptors.
    pub fn new() -> Self {
        let mut types = Vec::with_capacity(BUILTIN_TYPES.len());
        let mut by_name = IndexMap::new();
        for (i, b) in BUILTIN_TYPES.iter().enumerate() {
            by_name.insert(b.name.to_owned(), TypeId::from_raw(i as u32));
            types.push(TypeInfo {
                name: b.name.to_owned(),
                kind: b.kind,
                element: b.element,
                key: b.key,
                fields: Vec::new(),
            });
        }
        Self { types, by_name }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    fn push(&mut self, info: TypeInfo) -> Result<TypeId, RegistryError> {
        if self.by_name.contains_key(&info.name) {
            return Err(RegistryError::DuplicateType(info.name));
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.by_name.insert(info.name.clone(), id);
        self.types.push(info);
        Ok(id)
    }

    fn get_or_push(&mut self, info: TypeInfo) -> TypeId {
        match self.by_name.get(&info.name) {
            Some(&id) => id,
            None => {
                let id = TypeId::from_raw(self.types.len() as u32);
                self.by_name.insert(info.name.clone(), id);
                self.types.push(info);
                id
            }
        }
    }

    fn ensure_known(&self, ty: TypeId) -> Result<&TypeInfo, RegistryError> {
        self.types
            .get(ty.index())
            .ok_or(RegistryError::UnknownTypeId(ty.as_u32()))
    }

    /// Declare a named type whose element, key, or fields are set later.
    pub fn declare(&mut self, name: impl Into<String>, kind: Kind) -> Result<TypeId, RegistryError> {
        self.push(TypeInfo::new(name.into(), kind))
    }

    /// Canonical descriptor for a numeric kind, named after the kind.
    pub fn numeric(&mut self, kind: NumericKind) -> TypeId {
        self.get_or_push(TypeInfo::new(kind.name().to_owned(), Kind::Numeric(kind)))
    }

    /// Canonical pointer to `element`, named `*Element`.
    pub fn pointer(&mut self, element: TypeId) -> Result<TypeId, RegistryError> {
        let name = format!("*{}", self.ensure_known(element)?.name);
        let mut info = TypeInfo::new(name, Kind::Pointer);
        info.element = Some(element);
        Ok(self.get_or_push(info))
    }

    /// Canonical slice of `element`, named `[]Element`.
    pub fn array(&mut self, element: TypeId) -> Result<TypeId, RegistryError> {
        let name = format!("[]{}", self.ensure_known(element)?.name);
        let mut info = TypeInfo::new(name, Kind::Array);
        info.element = Some(element);
        Ok(self.get_or_push(info))
    }

    /// Canonical map type, named `map[Key]Value`.
    pub fn map(&mut self, key: TypeId, value: TypeId) -> Result<TypeId, RegistryError> {
        let name = format!(
            "map[{}]{}",
            self.ensure_known(key)?.name,
            self.ensure_known(value)?.name
        );
        let mut info = TypeInfo::new(name, Kind::Map);
        info.key = Some(key);
        info.element = Some(value);
        Ok(self.get_or_push(info))
    }

    /// Declare a struct with all of its members.
    pub fn structure(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldInfo>,
    ) -> Result<TypeId, RegistryError> {
        let id = self.declare(name, Kind::Struct)?;
        for field in fields {
            self.add_field(id, field)?;
        }
        Ok(id)
    }

    pub fn set_element(&mut self, ty: TypeId, element: TypeId) -> Result<(), RegistryError> {
        self.ensure_known(element)?;
        self.info_mut(ty)?.element = Some(element);
        Ok(())
    }

    pub fn set_key(&mut self, ty: TypeId, key: TypeId) -> Result<(), RegistryError> {
        self.ensure_known(key)?;
        self.info_mut(ty)?.key = Some(key);
        Ok(())
    }

    /// Append a member to a declared struct.
    pub fn add_field(&mut self, ty: TypeId, field: FieldInfo) -> Result<(), RegistryError> {
        self.ensure_known(field.ty)?;
        let info = self.info_mut(ty)?;
        if info.kind != Kind::Struct {
            return Err(RegistryError::NotAStruct(info.name.clone()));
        }
        info.fields.push(field);
        Ok(())
    }

    fn info_mut(&mut self, ty: TypeId) -> Result<&mut TypeInfo, RegistryError> {
        self.types
            .get_mut(ty.index())
            .ok_or(RegistryError::UnknownTypeId(ty.as_u32()))
    }

    /// Resolve a type reference from a document.
    fn resolve_ref(&mut self, name: &str) -> Result<TypeId, RegistryError> {
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        if let Some(inner) = name.strip_prefix('*') {
            let element = self.resolve_ref(inner)?;
            return self.pointer(element);
        }
        if let Some(inner) = name.strip_prefix("[]") {
            let element = self.resolve_ref(inner)?;
            return self.array(element);
        }
        if let Some(kind) = NumericKind::from_name(name) {
            return Ok(self.numeric(kind));
        }
        Err(RegistryError::UnknownType(name.to_owned()))
    }

    /// Add every type of a document.
    ///
    /// Names are declared first, so members may reference types defined
    /// later in the document.
    pub fn load_document(&mut self, doc: &RawDocument) -> Result<(), RegistryError> {
        let mut declared = Vec::with_capacity(doc.types.len());
        for raw in &doc.types {
            let kind = Kind::from_name(&raw.kind).ok_or_else(|| RegistryError::UnknownKind {
                name: raw.name.clone(),
                kind: raw.kind.clone(),
            })?;
            declared.push(self.declare(raw.name.clone(), kind)?);
        }

        for (raw, &id) in doc.types.iter().zip(&declared) {
            if let Some(element) = &raw.element {
                let element = self.resolve_ref(element)?;
                self.set_element(id, element)?;
            }
            if let Some(key) = &raw.key {
                let key = self.resolve_ref(key)?;
                self.set_key(id, key)?;
            }
            for f in &raw.fields {
                let ty = self.resolve_ref(&f.type_name)?;
                let mut field = FieldInfo::new(f.name.clone(), ty);
                field.tag = f.tag.clone();
                field.embedded = f.embedded;
                self.add_field(id, field)?;
            }
        }
        Ok(())
    }

    /// Validate and freeze the descriptor set.
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        for info in &self.types {
            if info.kind.has_element() && info.element.is_none() {
                return Err(RegistryError::MissingElement(info.name.clone()));
            }
            if info.kind == Kind::Map && info.key.is_none() {
                return Err(RegistryError::MissingKey(info.name.clone()));
            }
        }
        self.check_pointer_cycles()?;

        tracing::debug!(types = self.types.len(), "host type registry built");
        Ok(TypeRegistry {
            types: self.types,
            by_name: self.by_name,
        })
    }

    fn check_pointer_cycles(&self) -> Result<(), RegistryError> {
        let limit = self.types.len();
        for start in &self.types {
            if start.kind != Kind::Pointer {
                continue;
            }
            let mut current = start;
            let mut layers = 0usize;
            while current.kind == Kind::Pointer {
                layers += 1;
                if layers > limit {
                    return Err(RegistryError::PointerCycle(start.name.clone()));
                }
                let Some(next) = current.element.and_then(|e| self.types.get(e.index())) else {
                    break;
                };
                current = next;
            }
        }
        Ok(())
    }
}
