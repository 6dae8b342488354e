//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Program file, binary or JSON (positional).
pub fn program_path_arg() -> Arg {
    Arg::new("program_path")
        .value_name("PROGRAM")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Program file: encoded bytecode or JSON, '-' for stdin")
}

/// JSON program to assemble (positional).
pub fn json_path_arg() -> Arg {
    Arg::new("json_path")
        .value_name("JSON")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Program in JSON form, '-' for stdin")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}

/// Skip the verifier (--no-verify).
pub fn no_verify_arg() -> Arg {
    Arg::new("no_verify")
        .long("no-verify")
        .action(ArgAction::SetTrue)
        .help("Print malformed programs instead of rejecting them")
}

/// Host type document (positional).
pub fn types_path_arg() -> Arg {
    Arg::new("types_path")
        .value_name("TYPES")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Host type registry in JSON form")
}

/// Root type name (positional).
pub fn type_name_arg() -> Arg {
    Arg::new("type_name")
        .value_name("TYPE")
        .required(true)
        .help("Name of the type to start from")
}

/// Dotted member path (positional).
pub fn member_path_arg() -> Arg {
    Arg::new("member_path")
        .value_name("PATH")
        .help("Dotted member path, e.g. User.Address.City")
}

/// Embedding depth limit (--max-depth).
pub fn max_depth_arg() -> Arg {
    Arg::new("max_depth")
        .long("max-depth")
        .value_name("N")
        .default_value("32")
        .value_parser(value_parser!(u32))
        .help("Maximum embedded-struct nesting searched per member")
}

/// Opcode category filter (--category).
pub fn category_arg() -> Arg {
    Arg::new("category")
        .long("category")
        .value_name("NAME")
        .help("Only list opcodes of this category")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log verbosity (-v for debug, -vv for trace); overrides VEXPR_LOG")
}
