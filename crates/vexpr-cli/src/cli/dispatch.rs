//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the fields each command uses
//! - `Into<*Args>` impls bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::assemble::AssembleArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::opcodes::OpcodesArgs;
use crate::commands::resolve::ResolveArgs;
use crate::commands::verify::VerifyArgs;

pub struct OpcodesParams {
    pub category: Option<String>,
    pub color: ColorChoice,
}

impl OpcodesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            category: m.get_one::<String>("category").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<OpcodesParams> for OpcodesArgs {
    fn from(p: OpcodesParams) -> Self {
        Self {
            category: p.category,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AssembleParams {
    pub json_path: PathBuf,
    pub output: Option<PathBuf>,
}

impl AssembleParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            json_path: required_path(m, "json_path"),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<AssembleParams> for AssembleArgs {
    fn from(p: AssembleParams) -> Self {
        let output = p
            .output
            .unwrap_or_else(|| default_output_path(&p.json_path));
        Self {
            json_path: p.json_path,
            output,
        }
    }
}

pub struct VerifyParams {
    pub program_path: PathBuf,
}

impl VerifyParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: required_path(m, "program_path"),
        }
    }
}

impl From<VerifyParams> for VerifyArgs {
    fn from(p: VerifyParams) -> Self {
        Self {
            program_path: p.program_path,
        }
    }
}

pub struct DumpParams {
    pub program_path: PathBuf,
    pub no_verify: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: required_path(m, "program_path"),
            no_verify: m.get_flag("no_verify"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            program_path: p.program_path,
            verify: !p.no_verify,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ResolveParams {
    pub types_path: PathBuf,
    pub type_name: String,
    pub member_path: Option<String>,
    pub max_depth: u32,
    pub color: ColorChoice,
}

impl ResolveParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            types_path: required_path(m, "types_path"),
            type_name: m
                .get_one::<String>("type_name")
                .cloned()
                .expect("clap enforces required TYPE"),
            member_path: m.get_one::<String>("member_path").cloned(),
            max_depth: m.get_one::<u32>("max_depth").copied().unwrap_or(32),
            color: parse_color(m),
        }
    }
}

impl From<ResolveParams> for ResolveArgs {
    fn from(p: ResolveParams) -> Self {
        Self {
            types_path: p.types_path,
            type_name: p.type_name,
            member_path: p.member_path.unwrap_or_default(),
            max_depth: p.max_depth,
            color: p.color.should_colorize(),
        }
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id)
        .cloned()
        .expect("clap enforces required positionals")
}

/// `rule.json` assembles to `rule.vxb` next to it; stdin goes to `out.vxb`.
pub fn default_output_path(input: &std::path::Path) -> PathBuf {
    if input.as_os_str() == "-" {
        return PathBuf::from("out.vxb");
    }
    input.with_extension("vxb")
}
