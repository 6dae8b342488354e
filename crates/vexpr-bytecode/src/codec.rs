//! Binary program format.
//!
//! Layout: a 32-byte header, the code section (opcode byte followed by
//! fixed-width little-endian operands), then the constant pool encoded with
//! postcard. The header checksum is CRC32 over everything after the header.

use thiserror::Error;
use vexpr_core::NumericKind;

use crate::constant::{ConstId, Constant, SlotId};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::program::Program;

/// Magic bytes at the start of every encoded program.
pub const MAGIC: [u8; 4] = *b"VXPR";
/// Current binary format version.
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 32;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{what} count {count} does not fit the header")]
    TooLarge { what: &'static str, count: usize },

    #[error("constant pool encoding failed: {0}")]
    ConstantPool(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input too small for header: {0} bytes")]
    TooShort(usize),

    #[error("invalid magic: expected VXPR")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },

    #[error("checksum mismatch: header {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("code section exceeds input: {code_size} bytes from offset {offset}")]
    CodeOutOfBounds { offset: usize, code_size: u32 },

    #[error("offset {offset}: truncated instruction {opcode}")]
    Truncated { offset: usize, opcode: Opcode },

    #[error("offset {offset}: unknown opcode byte {byte:#04x}")]
    UnknownOpcode { offset: usize, byte: u8 },

    #[error("offset {offset}: sentinel opcode in code section")]
    SentinelOpcode { offset: usize },

    #[error("offset {offset}: invalid cast target {byte}")]
    InvalidCastTarget { offset: usize, byte: u8 },

    #[error("instruction count mismatch: header says {header}, decoded {actual}")]
    InstructionCount { header: u32, actual: usize },

    #[error("constant count mismatch: header says {header}, decoded {actual}")]
    ConstantCount { header: u32, actual: usize },

    #[error("constant pool decoding failed: {0}")]
    ConstantPool(String),
}

/// Fixed-size file header.
///
/// - 0-3: magic
/// - 4-7: version
/// - 8-11: CRC32 of bytes 32..
/// - 12-15: total size
/// - 16-19: instruction count
/// - 20-23: code section size in bytes
/// - 24-27: constant count
/// - 28-31: variable slot count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub checksum: u32,
    pub total_size: u32,
    pub instruction_count: u32,
    pub code_size: u32,
    pub constant_count: u32,
    pub slot_count: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            instruction_count: 0,
            code_size: 0,
            constant_count: 0,
            slot_count: 0,
        }
    }
}

impl Header {
    /// Decode from the first 32 bytes. Panics on shorter input.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_SIZE, "header too short");
        let word =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: word(4),
            checksum: word(8),
            total_size: word(12),
            instruction_count: word(16),
            code_size: word(20),
            constant_count: word(24),
            slot_count: word(28),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.instruction_count.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.code_size.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.constant_count.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.slot_count.to_le_bytes());
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}

fn count_u32(what: &'static str, count: usize) -> Result<u32, EncodeError> {
    u32::try_from(count).map_err(|_| EncodeError::TooLarge { what, count })
}

/// Serialize a program. Does not verify it.
pub fn encode(program: &Program) -> Result<Vec<u8>, EncodeError> {
    let mut output = vec![0u8; HEADER_SIZE];
    for inst in program.code() {
        inst.encode_into(&mut output);
    }
    let code_size = output.len() - HEADER_SIZE;

    let pool = postcard::to_allocvec(program.constants())
        .map_err(|e| EncodeError::ConstantPool(e.to_string()))?;
    output.extend_from_slice(&pool);

    let mut header = Header {
        total_size: count_u32("byte", output.len())?,
        instruction_count: count_u32("instruction", program.len())?,
        code_size: count_u32("code byte", code_size)?,
        constant_count: count_u32("constant", program.constants().len())?,
        slot_count: program.slots(),
        ..Header::default()
    };
    header.checksum = crc32fast::hash(&output[HEADER_SIZE..]);
    output[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

    tracing::debug!(
        bytes = output.len(),
        instructions = program.len(),
        "program encoded"
    );
    Ok(output)
}

/// Deserialize a program. Structural checks only; call
/// [`Program::verify`] before execution.
pub fn decode(bytes: &[u8]) -> Result<Program, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TooShort(bytes.len()));
    }
    let header = Header::from_bytes(bytes);
    if !header.validate_magic() {
        return Err(DecodeError::InvalidMagic);
    }
    if !header.validate_version() {
        return Err(DecodeError::UnsupportedVersion(header.version));
    }
    if header.total_size as usize != bytes.len() {
        return Err(DecodeError::SizeMismatch {
            header: header.total_size,
            actual: bytes.len(),
        });
    }
    let actual = crc32fast::hash(&bytes[HEADER_SIZE..]);
    if actual != header.checksum {
        return Err(DecodeError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let code_end = HEADER_SIZE
        .checked_add(header.code_size as usize)
        .filter(|&end| end <= bytes.len())
        .ok_or(DecodeError::CodeOutOfBounds {
            offset: HEADER_SIZE,
            code_size: header.code_size,
        })?;

    let mut code = Vec::with_capacity(header.code_size.min(header.instruction_count) as usize);
    let mut offset = HEADER_SIZE;
    while offset < code_end {
        let (inst, size) = decode_instruction(&bytes[offset..code_end], offset)?;
        code.push(inst);
        offset += size;
    }
    if code.len() != header.instruction_count as usize {
        return Err(DecodeError::InstructionCount {
            header: header.instruction_count,
            actual: code.len(),
        });
    }

    let constants: Vec<Constant> = postcard::from_bytes(&bytes[code_end..])
        .map_err(|e| DecodeError::ConstantPool(e.to_string()))?;
    if constants.len() != header.constant_count as usize {
        return Err(DecodeError::ConstantCount {
            header: header.constant_count,
            actual: constants.len(),
        });
    }

    Ok(Program::new(code, constants, header.slot_count))
}

/// Decode one instruction at the start of a non-empty `bytes`; `offset` is
/// only used for error reporting. Returns the instruction and its size.
fn decode_instruction(bytes: &[u8], offset: usize) -> Result<(Instruction, usize), DecodeError> {
    let byte = bytes[0];
    let op = Opcode::from_u8(byte).ok_or(DecodeError::UnknownOpcode { offset, byte })?;
    if op.is_sentinel() {
        return Err(DecodeError::SentinelOpcode { offset });
    }
    let size = op.size();
    if bytes.len() < size {
        return Err(DecodeError::Truncated { offset, opcode: op });
    }
    let operands = &bytes[1..size];
    let u32_at = |at: usize| {
        u32::from_le_bytes([operands[at], operands[at + 1], operands[at + 2], operands[at + 3]])
    };
    let u16_at = |at: usize| u16::from_le_bytes([operands[at], operands[at + 1]]);

    use Instruction as I;
    let inst = match op {
        Opcode::Push => I::Push {
            constant: ConstId(u32_at(0)),
        },
        Opcode::FetchEnv => I::FetchEnv {
            name: ConstId(u32_at(0)),
        },
        Opcode::FetchEnvFast => I::FetchEnvFast {
            path: ConstId(u32_at(0)),
        },
        Opcode::MatchesConst => I::MatchesConst {
            pattern: ConstId(u32_at(0)),
        },
        Opcode::Property => I::Property {
            name: ConstId(u32_at(0)),
        },
        Opcode::Jump => I::Jump { offset: u32_at(0) },
        Opcode::JumpIfTrue => I::JumpIfTrue { offset: u32_at(0) },
        Opcode::JumpIfFalse => I::JumpIfFalse { offset: u32_at(0) },
        Opcode::JumpBackward => I::JumpBackward { offset: u32_at(0) },
        Opcode::Call => I::Call { argc: u16_at(0) },
        Opcode::CallFast => I::CallFast {
            function: ConstId(u32_at(0)),
            argc: u16_at(4),
        },
        Opcode::Method => I::Method {
            name: ConstId(u32_at(0)),
            argc: u16_at(4),
        },
        Opcode::Array => I::Array { len: u32_at(0) },
        Opcode::Map => I::Map { len: u32_at(0) },
        Opcode::Store => I::Store {
            slot: SlotId(u32_at(0)),
        },
        Opcode::Load => I::Load {
            slot: SlotId(u32_at(0)),
        },
        Opcode::Inc => I::Inc {
            slot: SlotId(u32_at(0)),
        },
        Opcode::Cast => {
            let to = NumericKind::from_u8(operands[0]).ok_or(DecodeError::InvalidCastTarget {
                offset,
                byte: operands[0],
            })?;
            I::Cast { to }
        }
        other => match I::simple(other) {
            Some(inst) => inst,
            None => unreachable!("{other} carries operands"),
        },
    };
    Ok((inst, size))
}
