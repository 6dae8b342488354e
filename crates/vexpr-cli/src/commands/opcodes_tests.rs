use vexpr_core::Colors;

use super::opcodes::{categories, render};

fn row<'a>(listing: &'a str, name: &str) -> Vec<&'a str> {
    listing
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|tokens| tokens.get(1) == Some(&name))
        .unwrap_or_else(|| panic!("no row for {name}"))
}

#[test]
fn lists_every_opcode_once() {
    let listing = render(None, Colors::OFF).unwrap();
    // header plus one line per executable opcode
    assert_eq!(listing.lines().count(), 1 + 49);
    assert!(!listing.contains("Sentinel"));
}

#[test]
fn row_columns() {
    let listing = render(None, Colors::OFF).unwrap();
    assert_eq!(row(&listing, "Push"), ["0", "Push", "stack", "0→1", "const"]);
    assert_eq!(row(&listing, "Rot"), ["2", "Rot", "stack", "2→2"]);
    assert_eq!(
        row(&listing, "Map"),
        ["41", "Map", "collection", "2n→1", "count"]
    );
    assert_eq!(
        row(&listing, "Method"),
        ["39", "Method", "invocation", "argc+1→1", "const,argc"]
    );
    assert_eq!(
        row(&listing, "EndScope"),
        ["48", "EndScope", "scope", "0→0"]
    );
}

#[test]
fn fast_rows_name_their_fallback() {
    let listing = render(None, Colors::OFF).unwrap();
    let equal_int = row(&listing, "EqualInt").join(" ");
    assert_eq!(
        equal_int,
        "12 EqualInt comparison 2→1 fast Equal when both operands statically integer"
    );
    let call_fast = row(&listing, "CallFast").join(" ");
    assert_eq!(
        call_fast,
        "38 CallFast invocation argc→1 const,argc fast Call when callee resolved with matching arity"
    );
}

#[test]
fn filters_by_category() {
    let listing = render(Some("control"), Colors::OFF).unwrap();
    let names: Vec<&str> = listing
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(
        names,
        ["Jump", "JumpIfTrue", "JumpIfFalse", "JumpBackward"]
    );
}

#[test]
fn unknown_category_lists_choices() {
    let err = render(Some("io"), Colors::OFF).unwrap_err();
    assert!(err.starts_with("unknown category 'io'"), "{err}");
    assert!(err.contains("membership"));
}

#[test]
fn categories_in_catalog_order() {
    assert_eq!(
        categories(),
        [
            "stack",
            "fetch",
            "arithmetic",
            "comparison",
            "control",
            "membership",
            "ordering",
            "collection",
            "invocation",
            "casting",
            "variables",
            "scope",
        ]
    );
}

#[test]
fn colors_only_when_enabled() {
    let plain = render(Some("scope"), Colors::OFF).unwrap();
    let colored = render(Some("scope"), Colors::ON).unwrap();
    assert!(!plain.contains('\x1b'));
    assert!(colored.contains("\x1b[34mBeginScope"));
}
