use std::fs;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;
use vexpr_bytecode::{DecodeError, MAGIC, Program, decode};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Read { path: String, source: io::Error },

    #[error("input is neither vexpr bytecode nor UTF-8 JSON")]
    NotText,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid program JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read raw bytes from a file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>, LoadError> {
    let read_error = |source| LoadError::Read {
        path: path.display().to_string(),
        source,
    };
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(read_error)?;
        return Ok(buf);
    }
    fs::read(path).map_err(read_error)
}

pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let bytes = read_input(path)?;
    let program = parse_program(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        instructions = program.len(),
        constants = program.constants().len(),
        "program loaded"
    );
    Ok(program)
}

/// Encoded programs are recognized by their magic; anything else is JSON.
pub fn parse_program(bytes: &[u8]) -> Result<Program, LoadError> {
    if bytes.starts_with(&MAGIC) {
        return Ok(decode(bytes)?);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| LoadError::NotText)?;
    Ok(Program::from_json(text)?)
}
