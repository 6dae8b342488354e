use vexpr_core::NumericKind;

use super::constant::{ConstId, Constant, SlotId};
use super::instruction::Instruction as I;
use super::opcode::Opcode;
use super::program::Program;
use super::verify::{Verified, VerifyError, verify};

fn program(code: Vec<I>, constants: Vec<Constant>) -> Program {
    Program::new(code, constants, 0)
}

fn push(n: u32) -> I {
    I::Push {
        constant: ConstId(n),
    }
}

#[test]
fn single_value_program() {
    let p = program(vec![I::True], vec![]);
    assert_eq!(
        verify(&p),
        Ok(Verified {
            max_stack: 1,
            max_scope: 0,
            reachable: 1
        })
    );
}

#[test]
fn empty_program_has_no_result() {
    let p = program(vec![], vec![]);
    assert_eq!(verify(&p), Err(VerifyError::FinalStack { ip: 0, depth: 0 }));
}

#[test]
fn short_circuit_and() {
    // age >= 18 and name
    let p = program(
        vec![
            I::FetchEnv { name: ConstId(0) },
            push(1),
            I::MoreOrEqual,
            I::JumpIfFalse { offset: 2 },
            I::FetchEnv { name: ConstId(2) },
            I::Jump { offset: 1 },
            I::False,
        ],
        vec![
            Constant::String("age".into()),
            Constant::Int(18),
            Constant::String("name".into()),
        ],
    );
    let verified = verify(&p).unwrap();
    assert_eq!(verified.max_stack, 2);
    assert_eq!(verified.reachable, 7);
}

#[test]
fn loop_with_slots_and_scope() {
    // for i in 0..3 { }  as: V0 = 0; loop: V0 < 3 ? V0++ : exit
    let p = Program::new(
        vec![
            I::BeginScope,
            push(0),
            I::Store { slot: SlotId(0) },
            I::Load { slot: SlotId(0) },
            push(1),
            I::Less,
            I::JumpIfFalse { offset: 2 },
            I::Inc { slot: SlotId(0) },
            I::JumpBackward { offset: 6 },
            I::EndScope,
            I::Load { slot: SlotId(0) },
        ],
        vec![Constant::Int(0), Constant::Int(3)],
        1,
    );
    let verified = verify(&p).unwrap();
    assert_eq!(verified.max_scope, 1);
    assert_eq!(verified.max_stack, 2);
}

#[test]
fn unreachable_code_gets_operand_checks_only() {
    let p = program(vec![I::True, I::Jump { offset: 1 }, I::Pop], vec![]);
    assert_eq!(verify(&p).unwrap().reachable, 2);

    let p = program(vec![I::True, I::Jump { offset: 1 }, push(9)], vec![]);
    assert_eq!(
        verify(&p),
        Err(VerifyError::ConstantOutOfRange {
            ip: 2,
            index: 9,
            count: 0
        })
    );
}

#[test]
fn jump_bounds() {
    let p = program(vec![I::True, I::Jump { offset: 1 }], vec![]);
    assert_eq!(
        verify(&p),
        Err(VerifyError::JumpOutOfBounds {
            ip: 1,
            target: 3,
            len: 2
        })
    );

    let p = program(vec![I::True, I::JumpBackward { offset: 3 }], vec![]);
    assert_eq!(
        verify(&p),
        Err(VerifyError::JumpOutOfBounds {
            ip: 1,
            target: -1,
            len: 2
        })
    );

    // landing exactly on the end is allowed
    let p = program(vec![I::True, I::Jump { offset: 0 }], vec![]);
    assert!(verify(&p).is_ok());
}

#[test]
fn underflow() {
    let p = program(vec![I::True, I::Add], vec![]);
    assert_eq!(
        verify(&p),
        Err(VerifyError::StackUnderflow {
            ip: 1,
            opcode: Opcode::Add,
            pops: 2,
            depth: 1
        })
    );

    let p = program(vec![I::Nil, I::Call { argc: 1 }], vec![]);
    assert!(matches!(verify(&p), Err(VerifyError::StackUnderflow { ip: 1, pops: 2, .. })));
}

#[test]
fn paths_must_agree_on_depth() {
    // one branch leaves an extra value
    let p = program(
        vec![
            I::True,
            I::JumpIfTrue { offset: 1 },
            I::Nil,
            I::Nil,
        ],
        vec![],
    );
    assert!(matches!(verify(&p), Err(VerifyError::StackMismatch { ip: 3, .. })));
}

#[test]
fn final_stack_must_hold_one_value() {
    let p = program(vec![I::True, I::False], vec![]);
    assert_eq!(verify(&p), Err(VerifyError::FinalStack { ip: 2, depth: 2 }));
}

#[test]
fn scopes_must_balance() {
    let p = program(vec![I::EndScope, I::True], vec![]);
    assert_eq!(verify(&p), Err(VerifyError::ScopeUnderflow { ip: 0 }));

    let p = program(vec![I::BeginScope, I::True], vec![]);
    assert_eq!(verify(&p), Err(VerifyError::UnclosedScope { ip: 2, depth: 1 }));
}

#[test]
fn constant_kinds() {
    let p = program(vec![I::FetchEnv { name: ConstId(0) }], vec![Constant::Int(1)]);
    assert_eq!(
        verify(&p),
        Err(VerifyError::ConstantKind {
            ip: 0,
            opcode: Opcode::FetchEnv,
            expected: "string",
            found: "int"
        })
    );

    let p = program(
        vec![I::FetchEnvFast { path: ConstId(0) }],
        vec![Constant::String("user".into())],
    );
    assert!(matches!(
        verify(&p),
        Err(VerifyError::ConstantKind {
            expected: "path",
            ..
        })
    ));

    let p = program(
        vec![I::FetchEnvFast { path: ConstId(0) }],
        vec![Constant::FieldPath(vec![0, 2])],
    );
    assert!(verify(&p).is_ok());
}

#[test]
fn matches_const_requires_valid_regex() {
    let code = vec![
        I::FetchEnv { name: ConstId(0) },
        I::MatchesConst {
            pattern: ConstId(1),
        },
    ];
    let ok = program(
        code.clone(),
        vec![Constant::String("s".into()), Constant::Regex("^a+$".into())],
    );
    assert!(verify(&ok).is_ok());

    let bad = program(
        code,
        vec![Constant::String("s".into()), Constant::Regex("(unclosed".into())],
    );
    assert!(matches!(
        verify(&bad),
        Err(VerifyError::InvalidRegex { ip: 1, .. })
    ));
}

#[test]
fn call_fast_arity() {
    let code = vec![
        I::Nil,
        I::Nil,
        I::CallFast {
            function: ConstId(0),
            argc: 2,
        },
    ];
    let ok = program(code.clone(), vec![Constant::Function { index: 4, arity: 2 }]);
    assert!(verify(&ok).is_ok());

    let bad = program(code, vec![Constant::Function { index: 4, arity: 1 }]);
    assert_eq!(
        verify(&bad),
        Err(VerifyError::ArityMismatch {
            ip: 2,
            arity: 1,
            argc: 2
        })
    );
}

#[test]
fn slot_range() {
    let p = Program::new(
        vec![I::True, I::Store { slot: SlotId(1) }, I::Nil],
        vec![],
        1,
    );
    assert_eq!(
        verify(&p),
        Err(VerifyError::SlotOutOfRange {
            ip: 1,
            slot: 1,
            count: 1
        })
    );
}

#[test]
fn cast_and_collections() {
    let p = program(
        vec![
            push(0),
            I::Cast {
                to: NumericKind::Float32,
            },
            push(1),
            push(0),
            I::Map { len: 1 },
            I::Array { len: 2 },
            I::Len,
        ],
        vec![Constant::Int(1), Constant::String("k".into())],
    );
    assert!(verify(&p).is_ok());
}

#[test]
fn error_reports_ip() {
    let err = VerifyError::ScopeUnderflow { ip: 7 };
    assert_eq!(err.ip(), 7);
    assert_eq!(err.to_string(), "ip 7: EndScope without open scope");
}
