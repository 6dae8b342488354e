use indoc::indoc;

use crate::{
    FieldInfo, HostTypes, Kind, NumericKind, RegistryError, TypeId, TypeRegistry,
    parse_type_document,
};

const SAMPLE_JSON: &str = indoc! {r#"
    {
        "types": [
            {
                "name": "User",
                "kind": "struct",
                "fields": [
                    {"name": "Name", "type": "string"},
                    {"name": "Age", "type": "uint8"},
                    {"name": "Foo", "tag": "bar", "type": "int64"},
                    {"name": "Address", "type": "*Address"},
                    {"name": "Base", "type": "Base", "embedded": true}
                ]
            },
            {
                "name": "Address",
                "kind": "struct",
                "fields": [{"name": "City", "type": "string"}]
            },
            {
                "name": "Base",
                "kind": "struct",
                "fields": [{"name": "ID", "type": "int"}]
            },
            {"name": "Celsius", "kind": "float64"},
            {"name": "Tags", "kind": "array", "element": "string"},
            {"name": "Scores", "kind": "map", "key": "string", "element": "[]Celsius"}
        ]
    }
"#};

#[test]
fn parse_raw_document() {
    let doc = parse_type_document(SAMPLE_JSON).unwrap();
    assert_eq!(doc.types.len(), 6);

    let user = &doc.types[0];
    assert_eq!(user.kind, "struct");
    assert_eq!(user.fields.len(), 5);
    assert_eq!(user.fields[2].tag.as_deref(), Some("bar"));
    assert!(user.fields[4].embedded);
    assert!(!user.fields[0].embedded);
}

#[test]
fn load_document_resolves_forward_references() {
    let reg = TypeRegistry::from_json(SAMPLE_JSON).unwrap();

    let user = reg.lookup("User").unwrap();
    let address = reg.lookup("Address").unwrap();
    let addr_field = reg.fields(user).find(|f| f.name == "Address").unwrap();

    assert_eq!(reg.kind(addr_field.ty), Kind::Pointer);
    assert_eq!(reg.element(addr_field.ty), Some(address));
    assert_eq!(reg.name(addr_field.ty), "*Address");
}

#[test]
fn load_document_creates_numeric_and_composite_types() {
    let reg = TypeRegistry::from_json(SAMPLE_JSON).unwrap();

    let uint8 = reg.lookup("uint8").unwrap();
    assert_eq!(reg.kind(uint8), Kind::Numeric(NumericKind::Uint8));

    let celsius = reg.lookup("Celsius").unwrap();
    assert_eq!(reg.kind(celsius), Kind::Numeric(NumericKind::Float64));

    let scores = reg.lookup("Scores").unwrap();
    assert_eq!(reg.key(scores), Some(TypeId::STRING));
    let value = reg.element(scores).unwrap();
    assert_eq!(reg.name(value), "[]Celsius");
    assert_eq!(reg.element(value), Some(celsius));
}

#[test]
fn canonical_composites_are_deduplicated() {
    let mut b = TypeRegistry::builder();
    let p1 = b.pointer(TypeId::INT).unwrap();
    let p2 = b.pointer(TypeId::INT).unwrap();
    let a1 = b.array(TypeId::STRING).unwrap();
    let a2 = b.array(TypeId::STRING).unwrap();
    let n1 = b.numeric(NumericKind::Int16);
    let n2 = b.numeric(NumericKind::Int16);
    assert_eq!(p1, p2);
    assert_eq!(a1, a2);
    assert_eq!(n1, n2);
    assert_eq!(b.numeric(NumericKind::Int), TypeId::INT);
}

#[test]
fn duplicate_name_rejected() {
    let mut b = TypeRegistry::builder();
    b.declare("User", Kind::Struct).unwrap();
    assert_eq!(
        b.declare("User", Kind::Struct),
        Err(RegistryError::DuplicateType("User".into()))
    );
}

#[test]
fn unknown_reference_rejected() {
    let json = r#"{"types": [{"name": "A", "kind": "struct", "fields": [{"name": "x", "type": "Nope"}]}]}"#;
    assert_eq!(
        TypeRegistry::from_json(json).unwrap_err(),
        RegistryError::UnknownType("Nope".into())
    );
}

#[test]
fn unknown_kind_rejected() {
    let json = r#"{"types": [{"name": "A", "kind": "complex128"}]}"#;
    assert_eq!(
        TypeRegistry::from_json(json).unwrap_err(),
        RegistryError::UnknownKind {
            name: "A".into(),
            kind: "complex128".into()
        }
    );
}

#[test]
fn malformed_document_rejected() {
    let err = TypeRegistry::from_json("{ not json").unwrap_err();
    assert!(matches!(err, RegistryError::Document(_)));
}

#[test]
fn fields_only_on_structs() {
    let mut b = TypeRegistry::builder();
    let f = b.declare("Handler", Kind::Func).unwrap();
    assert_eq!(
        b.add_field(f, FieldInfo::new("x", TypeId::INT)),
        Err(RegistryError::NotAStruct("Handler".into()))
    );
}

#[test]
fn missing_element_rejected() {
    let mut b = TypeRegistry::builder();
    b.declare("Dangling", Kind::Pointer).unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        RegistryError::MissingElement("Dangling".into())
    );
}

#[test]
fn missing_map_key_rejected() {
    let mut b = TypeRegistry::builder();
    let m = b.declare("Lookup", Kind::Map).unwrap();
    b.set_element(m, TypeId::INT).unwrap();
    assert_eq!(b.build().unwrap_err(), RegistryError::MissingKey("Lookup".into()));
}

#[test]
fn pointer_cycle_rejected() {
    let json = indoc! {r#"
        {
            "types": [
                {"name": "A", "kind": "pointer", "element": "B"},
                {"name": "B", "kind": "pointer", "element": "A"}
            ]
        }
    "#};
    assert_eq!(
        TypeRegistry::from_json(json).unwrap_err(),
        RegistryError::PointerCycle("A".into())
    );
}

#[test]
fn recursive_struct_through_pointer_is_allowed() {
    let json = indoc! {r#"
        {
            "types": [
                {"name": "Node", "kind": "struct", "fields": [
                    {"name": "Next", "type": "*Node"},
                    {"name": "Value", "type": "int"}
                ]}
            ]
        }
    "#};
    let reg = TypeRegistry::from_json(json).unwrap();
    let node = reg.lookup("Node").unwrap();
    let next = reg.fields(node).next().unwrap().ty;
    assert_eq!(reg.dereference(Some(next)), Some(node));
}

#[test]
fn foreign_ids_rejected_by_builder() {
    let mut b = TypeRegistry::builder();
    assert_eq!(
        b.pointer(TypeId::custom(99)),
        Err(RegistryError::UnknownTypeId(TypeId::custom(99).as_u32()))
    );
}
