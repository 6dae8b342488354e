mod cli;
mod commands;
mod logging;

use cli::{AssembleParams, DumpParams, OpcodesParams, ResolveParams, VerifyParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    let verbosity = matches
        .subcommand()
        .map_or(0, |(_, m)| m.get_count("verbose"));
    logging::init(verbosity);

    match matches.subcommand() {
        Some(("opcodes", m)) => {
            let params = OpcodesParams::from_matches(m);
            commands::opcodes::run(params.into());
        }
        Some(("assemble", m)) => {
            let params = AssembleParams::from_matches(m);
            commands::assemble::run(params.into());
        }
        Some(("verify", m)) => {
            let params = VerifyParams::from_matches(m);
            commands::verify::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("resolve", m)) => {
            let params = ResolveParams::from_matches(m);
            commands::resolve::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
