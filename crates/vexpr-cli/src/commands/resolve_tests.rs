use indoc::indoc;
use vexpr_checker::ResolveLimits;
use vexpr_core::{Colors, TypeId, TypeRegistry};

use super::resolve::{classify, describe, resolve};

const TYPES: &str = indoc! {r#"
    {
        "types": [
            {
                "name": "Env",
                "kind": "struct",
                "fields": [
                    {"name": "User", "type": "*User"},
                    {"name": "Meta", "type": "any"},
                    {"name": "Since", "type": "duration"}
                ]
            },
            {
                "name": "User",
                "kind": "struct",
                "fields": [
                    {"name": "Base", "type": "Base", "embedded": true},
                    {"name": "Name", "type": "string"},
                    {"name": "Login", "tag": "login", "type": "string"}
                ]
            },
            {
                "name": "Base",
                "kind": "struct",
                "fields": [{"name": "ID", "type": "uint32"}]
            }
        ]
    }
"#};

fn registry() -> TypeRegistry {
    TypeRegistry::from_json(TYPES).unwrap()
}

fn show(path: &str) -> String {
    let reg = registry();
    let ty = resolve(&reg, "Env", path, ResolveLimits::default())
        .unwrap()
        .unwrap();
    describe(&reg, ty, Colors::OFF)
}

#[test]
fn pointer_to_struct() {
    insta::assert_snapshot!(show("User"), @r"
    type: *User
    kind: pointer
    dereferenced: User (struct)
    classes: struct
    members: Base (embedded), Name, login
    ");
}

#[test]
fn promoted_member() {
    insta::assert_snapshot!(show("User.ID"), @r"
    type: uint32
    kind: uint32
    classes: integer, number
    ");
}

#[test]
fn interface_member_is_optimistic() {
    insta::assert_snapshot!(show("Meta.anything"), @r"
    type: any
    kind: interface
    classes: interface, integer, float, number, time, bool, string, array, map
    ");
}

#[test]
fn empty_path_describes_root() {
    let out = show("");
    assert!(out.starts_with("type: Env\nkind: struct\n"), "{out}");
    assert!(out.ends_with("members: User, Meta, Since\n"), "{out}");
}

#[test]
fn missing_member_is_none() {
    let reg = registry();
    let limits = ResolveLimits::default();
    assert_eq!(resolve(&reg, "Env", "User.Login", limits), Ok(None));
    assert_eq!(resolve(&reg, "Env", "Since.Hours", limits), Ok(None));
}

#[test]
fn unknown_root_type() {
    let reg = registry();
    let err = resolve(&reg, "Nope", "", ResolveLimits::default()).unwrap_err();
    assert_eq!(err, "unknown type 'Nope'");
}

#[test]
fn depth_limit_hides_promoted_members() {
    let reg = registry();
    let limits = ResolveLimits::new().max_embedding_depth(0);
    assert_eq!(resolve(&reg, "Env", "User.ID", limits), Ok(None));
    assert_eq!(
        resolve(&reg, "Env", "User.Name", limits),
        Ok(Some(TypeId::STRING))
    );
}

#[test]
fn duration_has_no_interface_fallback() {
    let reg = registry();
    assert_eq!(classify(&reg, Some(TypeId::DURATION)), ["duration"]);
    assert!(classify(&reg, None).is_empty());
}
