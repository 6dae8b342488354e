use std::fs;
use std::path::PathBuf;

use vexpr_bytecode::{Program, encode};

use super::program_loader::read_input;

pub struct AssembleArgs {
    pub json_path: PathBuf,
    pub output: PathBuf,
}

pub fn run(args: AssembleArgs) {
    let encoded = match read_input(&args.json_path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| assemble(&bytes))
    {
        Ok(encoded) => encoded,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(&args.output, &encoded) {
        eprintln!("error: failed to write '{}': {}", args.output.display(), e);
        std::process::exit(1);
    }
    tracing::info!(
        output = %args.output.display(),
        bytes = encoded.len(),
        "program assembled"
    );
}

/// JSON program text to verified bytecode.
pub fn assemble(json: &[u8]) -> Result<Vec<u8>, String> {
    let text = std::str::from_utf8(json).map_err(|_| "program JSON is not UTF-8".to_string())?;
    let program = Program::from_json(text).map_err(|e| format!("invalid program JSON: {e}"))?;
    program.verify().map_err(|e| e.to_string())?;
    encode(&program).map_err(|e| e.to_string())
}
