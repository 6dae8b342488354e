//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! Every command accepts `-v` for diagnostic logging.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("vexpr")
        .about("Inspect host type registries and expression bytecode")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(opcodes_command())
        .subcommand(assemble_command())
        .subcommand(verify_command())
        .subcommand(dump_command())
        .subcommand(resolve_command())
}

/// List the instruction set.
pub fn opcodes_command() -> Command {
    Command::new("opcodes")
        .about("List the instruction set")
        .after_help(
            r#"EXAMPLES:
  vexpr opcodes                        # full catalog
  vexpr opcodes --category membership  # one group"#,
        )
        .arg(category_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Encode a JSON program into bytecode.
pub fn assemble_command() -> Command {
    Command::new("assemble")
        .about("Verify a JSON program and encode it as bytecode")
        .override_usage(
            "\
  vexpr assemble <JSON>
  vexpr assemble <JSON> -o <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  vexpr assemble rule.json             # writes rule.vxb
  vexpr assemble rule.json -o out.vxb  # explicit output"#,
        )
        .arg(json_path_arg())
        .arg(output_file_arg())
        .arg(verbose_arg())
}

/// Check a program for well-formedness.
pub fn verify_command() -> Command {
    Command::new("verify")
        .about("Check a program for well-formedness")
        .after_help(
            r#"EXAMPLES:
  vexpr verify rule.vxb                # encoded program
  vexpr verify rule.json               # JSON program"#,
        )
        .arg(program_path_arg())
        .arg(verbose_arg())
}

/// Show a program listing.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show a program listing")
        .after_help(
            r#"EXAMPLES:
  vexpr dump rule.vxb                  # verified listing
  vexpr dump broken.json --no-verify   # list without checking"#,
        )
        .arg(program_path_arg())
        .arg(no_verify_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Resolve a member path against host types.
pub fn resolve_command() -> Command {
    Command::new("resolve")
        .about("Resolve a member path against a host type registry")
        .override_usage(
            "\
  vexpr resolve <TYPES> <TYPE>
  vexpr resolve <TYPES> <TYPE> <PATH>",
        )
        .after_help(
            r#"EXAMPLES:
  vexpr resolve types.json Env                # classify a type
  vexpr resolve types.json Env User.Name      # promoted and tagged members
  vexpr resolve types.json Env Meta --max-depth 4"#,
        )
        .arg(types_path_arg())
        .arg(type_name_arg())
        .arg(member_path_arg())
        .arg(max_depth_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}
