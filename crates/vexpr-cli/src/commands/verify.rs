use std::path::PathBuf;

use vexpr_bytecode::{Program, Verified};

use super::program_loader::load_program;

pub struct VerifyArgs {
    pub program_path: PathBuf,
}

pub fn run(args: VerifyArgs) {
    let program = match load_program(&args.program_path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match program.verify() {
        Ok(verified) => println!("{}", summary(&program, &verified)),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// One-line verdict for a well-formed program.
pub fn summary(program: &Program, verified: &Verified) -> String {
    format!(
        "ok: {} instructions ({} reachable), {} constants, {} slots, max stack {}, max scope {}",
        program.len(),
        verified.reachable,
        program.constants().len(),
        program.slots(),
        verified.max_stack,
        verified.max_scope,
    )
}
