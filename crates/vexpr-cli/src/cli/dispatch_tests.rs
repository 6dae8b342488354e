//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Each command parses its positionals and flags
//! 2. Params extraction: correct fields are extracted from ArgMatches
//! 3. Defaults: output path, color mode, embedding depth

use std::path::{Path, PathBuf};

use super::*;
use crate::cli::commands::{
    assemble_command, dump_command, opcodes_command, resolve_command, verify_command,
};
use crate::cli::dispatch::default_output_path;
use crate::commands::assemble::AssembleArgs;
use crate::commands::resolve::ResolveArgs;
use crate::logging::default_directive;

#[test]
fn cli_is_well_formed() {
    build_cli().debug_assert();
}

#[test]
fn cli_requires_subcommand() {
    let result = build_cli().try_get_matches_from(["vexpr"]);
    assert!(result.is_err());
}

#[test]
fn opcodes_category_filter() {
    let m = opcodes_command()
        .try_get_matches_from(["opcodes", "--category", "scope", "--color", "never"])
        .unwrap();
    let params = OpcodesParams::from_matches(&m);
    assert_eq!(params.category.as_deref(), Some("scope"));
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn assemble_defaults_output_next_to_input() {
    let m = assemble_command()
        .try_get_matches_from(["assemble", "rules/adult.json"])
        .unwrap();
    let args: AssembleArgs = AssembleParams::from_matches(&m).into();
    assert_eq!(args.json_path, PathBuf::from("rules/adult.json"));
    assert_eq!(args.output, PathBuf::from("rules/adult.vxb"));
}

#[test]
fn assemble_explicit_output() {
    let m = assemble_command()
        .try_get_matches_from(["assemble", "adult.json", "-o", "build/a.vxb"])
        .unwrap();
    let args: AssembleArgs = AssembleParams::from_matches(&m).into();
    assert_eq!(args.output, PathBuf::from("build/a.vxb"));
}

#[test]
fn assemble_requires_input() {
    let result = assemble_command().try_get_matches_from(["assemble"]);
    assert!(result.is_err());
}

#[test]
fn stdin_assembles_to_fixed_name() {
    assert_eq!(default_output_path(Path::new("-")), PathBuf::from("out.vxb"));
}

#[test]
fn verify_takes_program_path() {
    let m = verify_command()
        .try_get_matches_from(["verify", "adult.vxb", "-vv"])
        .unwrap();
    let params = VerifyParams::from_matches(&m);
    assert_eq!(params.program_path, PathBuf::from("adult.vxb"));
    assert_eq!(m.get_count("verbose"), 2);
}

#[test]
fn dump_no_verify_flag() {
    let m = dump_command()
        .try_get_matches_from(["dump", "broken.json", "--no-verify"])
        .unwrap();
    let params = DumpParams::from_matches(&m);
    assert!(params.no_verify);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn dump_rejects_unknown_color() {
    let result = dump_command().try_get_matches_from(["dump", "a.vxb", "--color", "rainbow"]);
    assert!(result.is_err());
}

#[test]
fn resolve_positionals_and_depth() {
    let m = resolve_command()
        .try_get_matches_from(["resolve", "types.json", "Env", "User.Name", "--max-depth", "4"])
        .unwrap();
    let args: ResolveArgs = ResolveParams::from_matches(&m).into();
    assert_eq!(args.types_path, PathBuf::from("types.json"));
    assert_eq!(args.type_name, "Env");
    assert_eq!(args.member_path, "User.Name");
    assert_eq!(args.max_depth, 4);
}

#[test]
fn resolve_path_is_optional() {
    let m = resolve_command()
        .try_get_matches_from(["resolve", "types.json", "Env"])
        .unwrap();
    let args: ResolveArgs = ResolveParams::from_matches(&m).into();
    assert_eq!(args.member_path, "");
    assert_eq!(args.max_depth, 32);
}

#[test]
fn resolve_rejects_non_numeric_depth() {
    let result = resolve_command().try_get_matches_from([
        "resolve",
        "types.json",
        "Env",
        "--max-depth",
        "deep",
    ]);
    assert!(result.is_err());
}

#[test]
fn verbosity_maps_to_log_level() {
    assert_eq!(default_directive(0), "warn");
    assert_eq!(default_directive(1), "debug");
    assert_eq!(default_directive(2), "trace");
    assert_eq!(default_directive(5), "trace");
}
