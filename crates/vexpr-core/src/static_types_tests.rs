use crate::{HostTypes, Kind, NumericKind, StaticField, StaticHostTypes, StaticTypeInfo, TypeId};

const ADDRESS: TypeId = TypeId::custom(0);
const ADDRESS_PTR: TypeId = TypeId::custom(1);
const USER: TypeId = TypeId::custom(2);
const INT64: TypeId = TypeId::custom(3);

static ADDRESS_FIELDS: [StaticField; 1] = [StaticField::new("City", TypeId::STRING)];
static USER_FIELDS: [StaticField; 3] = [
    StaticField::new("Name", TypeId::STRING),
    StaticField::tagged("Foo", "bar", INT64),
    StaticField::embedded("Address", ADDRESS_PTR),
];
static TYPES: [StaticTypeInfo; 4] = [
    StaticTypeInfo::structure("Address", &ADDRESS_FIELDS),
    StaticTypeInfo::pointer("*Address", ADDRESS),
    StaticTypeInfo::structure("User", &USER_FIELDS),
    StaticTypeInfo::scalar("int64", Kind::Numeric(NumericKind::Int64)),
];
static HOST: StaticHostTypes = StaticHostTypes::new(&TYPES);

#[test]
fn builtins_served_without_table_entries() {
    assert_eq!(HOST.kind(TypeId::ANY), Kind::Interface);
    assert_eq!(HOST.name(TypeId::STRING), "string");
    assert_eq!(HOST.element(TypeId::ARRAY), Some(TypeId::ANY));
    assert_eq!(HOST.type_count(), TypeId::BUILTIN_COUNT as usize + 4);
    assert_eq!(HOST.len(), 4);
}

#[test]
fn custom_ids_follow_builtins() {
    assert_eq!(HOST.lookup("Address"), Some(ADDRESS));
    assert_eq!(HOST.lookup("User"), Some(USER));
    assert_eq!(HOST.lookup("int"), Some(TypeId::INT));
    assert_eq!(HOST.lookup("Missing"), None);
}

#[test]
fn fields_and_dereference() {
    let fields: Vec<_> = HOST.fields(USER).collect();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[1].effective_name(), "bar");
    assert!(fields[2].embedded);
    assert_eq!(HOST.dereference(Some(fields[2].ty)), Some(ADDRESS));
}

#[test]
fn get_out_of_range() {
    assert!(HOST.get(TypeId::custom(4)).is_none());
    assert!(HOST.get(TypeId::NIL).is_some());
}
