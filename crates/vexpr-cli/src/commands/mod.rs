pub mod assemble;
pub mod dump;
pub mod opcodes;
pub mod program_loader;
pub mod resolve;
pub mod verify;

#[cfg(test)]
mod opcodes_tests;
#[cfg(test)]
mod resolve_tests;
