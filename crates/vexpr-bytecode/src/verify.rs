//! Program well-formedness.
//!
//! A malformed program is a code generation defect. The executor assumes
//! every property checked here:
//! - jump targets within `[0, len]` (`len` means "end of program")
//! - constant and slot indices in range, constant kinds matching the opcode
//! - one stack depth per reachable instruction, never below zero
//! - exactly one value on the stack when execution ends
//! - scope markers balanced along every path
//!
//! The stack discipline is checked by abstract interpretation over the
//! control flow graph; unreachable instructions only get operand checks.

use thiserror::Error;

use crate::constant::Constant;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::program::Program;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("ip {ip}: jump target {target} outside program of {len} instructions")]
    JumpOutOfBounds { ip: usize, target: i64, len: usize },

    #[error("ip {ip}: constant C{index} out of range (pool has {count})")]
    ConstantOutOfRange { ip: usize, index: u32, count: usize },

    #[error("ip {ip}: {opcode} expects a {expected} constant, found {found}")]
    ConstantKind {
        ip: usize,
        opcode: Opcode,
        expected: &'static str,
        found: &'static str,
    },

    #[error("ip {ip}: invalid regex constant: {message}")]
    InvalidRegex { ip: usize, message: String },

    #[error("ip {ip}: callee takes {arity} arguments, call passes {argc}")]
    ArityMismatch { ip: usize, arity: u16, argc: u16 },

    #[error("ip {ip}: slot V{slot} out of range (frame has {count})")]
    SlotOutOfRange { ip: usize, slot: u32, count: u32 },

    #[error("ip {ip}: {opcode} pops {pops} values, stack holds {depth}")]
    StackUnderflow {
        ip: usize,
        opcode: Opcode,
        pops: u32,
        depth: u32,
    },

    #[error("ip {ip}: stack depth {found} disagrees with {expected} from another path")]
    StackMismatch { ip: usize, expected: u32, found: u32 },

    #[error("ip {ip}: EndScope without open scope")]
    ScopeUnderflow { ip: usize },

    #[error("ip {ip}: scope depth {found} disagrees with {expected} from another path")]
    ScopeMismatch { ip: usize, expected: u32, found: u32 },

    #[error("ip {ip}: program ends with {depth} values on the stack, expected 1")]
    FinalStack { ip: usize, depth: u32 },

    #[error("ip {ip}: program ends with {depth} open scopes")]
    UnclosedScope { ip: usize, depth: u32 },
}

impl VerifyError {
    /// Instruction index the error is attributed to.
    pub fn ip(&self) -> usize {
        match *self {
            Self::JumpOutOfBounds { ip, .. }
            | Self::ConstantOutOfRange { ip, .. }
            | Self::ConstantKind { ip, .. }
            | Self::InvalidRegex { ip, .. }
            | Self::ArityMismatch { ip, .. }
            | Self::SlotOutOfRange { ip, .. }
            | Self::StackUnderflow { ip, .. }
            | Self::StackMismatch { ip, .. }
            | Self::ScopeUnderflow { ip }
            | Self::ScopeMismatch { ip, .. }
            | Self::FinalStack { ip, .. }
            | Self::UnclosedScope { ip, .. } => ip,
        }
    }
}

/// Facts established by a successful verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Verified {
    /// Deepest operand stack any path reaches.
    pub max_stack: u32,
    /// Deepest scope nesting any path reaches.
    pub max_scope: u32,
    /// Instructions reachable from the entry point.
    pub reachable: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct State {
    depth: u32,
    scope: u32,
}

#[tracing::instrument(level = "debug", skip_all, fields(len = program.len()))]
pub fn verify(program: &Program) -> Result<Verified, VerifyError> {
    let code = program.code();
    for (ip, inst) in code.iter().enumerate() {
        check_operands(program, ip, inst)?;
    }

    let len = code.len();
    let mut states: Vec<Option<State>> = vec![None; len + 1];
    let mut worklist = vec![0usize];
    states[0] = Some(State { depth: 0, scope: 0 });
    let mut verified = Verified::default();

    while let Some(ip) = worklist.pop() {
        let Some(state) = states[ip] else {
            continue;
        };
        if ip == len {
            if state.depth != 1 {
                return Err(VerifyError::FinalStack {
                    ip,
                    depth: state.depth,
                });
            }
            if state.scope != 0 {
                return Err(VerifyError::UnclosedScope {
                    ip,
                    depth: state.scope,
                });
            }
            continue;
        }

        let inst = code[ip];
        let (pops, pushes) = inst.stack_effect();
        if state.depth < pops {
            return Err(VerifyError::StackUnderflow {
                ip,
                opcode: inst.opcode(),
                pops,
                depth: state.depth,
            });
        }
        let scope = match inst {
            Instruction::BeginScope => state.scope + 1,
            Instruction::EndScope => match state.scope.checked_sub(1) {
                Some(s) => s,
                None => return Err(VerifyError::ScopeUnderflow { ip }),
            },
            _ => state.scope,
        };
        let next = State {
            depth: state.depth - pops + pushes,
            scope,
        };
        verified.max_stack = verified.max_stack.max(next.depth);
        verified.max_scope = verified.max_scope.max(next.scope);

        if !inst.opcode().is_unconditional_jump() {
            merge(&mut states, &mut worklist, ip + 1, next)?;
        }
        if let Some(target) = inst.jump_target(ip) {
            // bounds were checked with the operands
            merge(&mut states, &mut worklist, target as usize, next)?;
        }
    }

    verified.reachable = states[..len].iter().filter(|s| s.is_some()).count();
    tracing::debug!(
        max_stack = verified.max_stack,
        reachable = verified.reachable,
        "program verified"
    );
    Ok(verified)
}

fn merge(
    states: &mut [Option<State>],
    worklist: &mut Vec<usize>,
    ip: usize,
    incoming: State,
) -> Result<(), VerifyError> {
    match states[ip] {
        None => {
            states[ip] = Some(incoming);
            worklist.push(ip);
            Ok(())
        }
        Some(known) if known.depth != incoming.depth => Err(VerifyError::StackMismatch {
            ip,
            expected: known.depth,
            found: incoming.depth,
        }),
        Some(known) if known.scope != incoming.scope => Err(VerifyError::ScopeMismatch {
            ip,
            expected: known.scope,
            found: incoming.scope,
        }),
        Some(_) => Ok(()),
    }
}

fn check_operands(program: &Program, ip: usize, inst: &Instruction) -> Result<(), VerifyError> {
    let len = program.len();
    if let Some(target) = inst.jump_target(ip)
        && !(0..=len as i64).contains(&target)
    {
        return Err(VerifyError::JumpOutOfBounds { ip, target, len });
    }

    if let Some(slot) = inst.slot()
        && slot.0 >= program.slots()
    {
        return Err(VerifyError::SlotOutOfRange {
            ip,
            slot: slot.0,
            count: program.slots(),
        });
    }

    let Some(id) = inst.constant() else {
        return Ok(());
    };
    let Some(constant) = program.constant(id) else {
        return Err(VerifyError::ConstantOutOfRange {
            ip,
            index: id.0,
            count: program.constants().len(),
        });
    };
    let opcode = inst.opcode();
    let kind_error = |expected| VerifyError::ConstantKind {
        ip,
        opcode,
        expected,
        found: constant.kind_name(),
    };

    match (inst, constant) {
        (Instruction::Push { .. }, _) => Ok(()),
        (
            Instruction::FetchEnv { .. } | Instruction::Property { .. } | Instruction::Method { .. },
            Constant::String(_),
        ) => Ok(()),
        (Instruction::FetchEnv { .. } | Instruction::Property { .. } | Instruction::Method { .. }, _) => {
            Err(kind_error("string"))
        }
        (Instruction::FetchEnvFast { .. }, Constant::FieldPath(_)) => Ok(()),
        (Instruction::FetchEnvFast { .. }, _) => Err(kind_error("path")),
        (Instruction::MatchesConst { .. }, Constant::Regex(pattern)) => {
            regex_syntax::Parser::new()
                .parse(pattern)
                .map(|_| ())
                .map_err(|e| VerifyError::InvalidRegex {
                    ip,
                    message: e.to_string(),
                })
        }
        (Instruction::MatchesConst { .. }, _) => Err(kind_error("regex")),
        (Instruction::CallFast { argc, .. }, Constant::Function { arity, .. }) => {
            if arity == argc {
                Ok(())
            } else {
                Err(VerifyError::ArityMismatch {
                    ip,
                    arity: *arity,
                    argc: *argc,
                })
            }
        }
        (Instruction::CallFast { .. }, _) => Err(kind_error("func")),
        _ => Ok(()),
    }
}
