use std::path::PathBuf;

use vexpr_bytecode::dump;
use vexpr_core::Colors;

use super::program_loader::load_program;

pub struct DumpArgs {
    pub program_path: PathBuf,
    pub verify: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let program = match load_program(&args.program_path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if args.verify
        && let Err(e) = program.verify()
    {
        eprintln!("error: {}", e);
        eprintln!();
        eprintln!("Use --no-verify to list it anyway.");
        std::process::exit(1);
    }

    let colors = Colors::new(args.color);
    print!("{}", dump(&program, colors));
}
