use vexpr_core::{NumericKind, TypeId, TypeRegistry};

use super::{
    assign_default_literal_types, balance_literal_operands, default_literal_type,
    is_integer_or_arithmetic, set_type_for_integers,
};
use crate::ast::{Ast, BinaryOp, NodeKind, TypeSlots, UnaryOp};

#[test]
fn nested_arithmetic_is_a_literal_chain() {
    // 2 + 3 * 4
    let mut ast = Ast::new();
    let two = ast.integer(2);
    let three = ast.integer(3);
    let four = ast.integer(4);
    let product = ast.binary(BinaryOp::Mul, three, four);
    let root = ast.binary(BinaryOp::Add, two, product);

    assert!(is_integer_or_arithmetic(&ast, root));

    let mut reg = TypeRegistry::builder();
    let int64 = reg.numeric(NumericKind::Int64);
    let mut slots = TypeSlots::for_ast(&ast);
    assert_eq!(set_type_for_integers(&ast, &mut slots, root, int64), 3);

    for leaf in [two, three, four] {
        assert_eq!(slots.get(leaf), Some(int64));
    }
    assert_eq!(slots.get(product), None);
    assert_eq!(slots.get(root), None);
}

#[test]
fn signs_keep_the_chain() {
    // -(1 - +2) / 3
    let mut ast = Ast::new();
    let one = ast.integer(1);
    let two = ast.integer(2);
    let plus_two = ast.unary(UnaryOp::Plus, two);
    let diff = ast.binary(BinaryOp::Sub, one, plus_two);
    let neg = ast.unary(UnaryOp::Minus, diff);
    let three = ast.integer(3);
    let root = ast.binary(BinaryOp::Div, neg, three);

    assert!(is_integer_or_arithmetic(&ast, root));

    let mut slots = TypeSlots::new();
    assert_eq!(set_type_for_integers(&ast, &mut slots, root, TypeId::INT), 3);
}

#[test]
fn chain_breaks_on_other_nodes() {
    let mut ast = Ast::new();
    let one = ast.integer(1);
    let not_one = ast.unary(UnaryOp::Not, one);
    let half = ast.float(0.5);
    let two = ast.integer(2);
    let sum_float = ast.binary(BinaryOp::Add, two, half);
    let five = ast.integer(5);
    let three = ast.integer(3);
    let modulo = ast.binary(BinaryOp::Mod, five, three);
    let x = ast.identifier("x");

    assert!(is_integer_or_arithmetic(&ast, one));
    assert!(!is_integer_or_arithmetic(&ast, not_one));
    assert!(!is_integer_or_arithmetic(&ast, sum_float));
    assert!(!is_integer_or_arithmetic(&ast, modulo));
    assert!(!is_integer_or_arithmetic(&ast, x));
}

#[test]
fn call_is_a_propagation_boundary() {
    // f(2) + 3
    let mut ast = Ast::new();
    let f = ast.identifier("f");
    let two = ast.integer(2);
    let call = ast.call(f, vec![two]);
    let three = ast.integer(3);
    let root = ast.binary(BinaryOp::Add, call, three);

    assert!(!is_integer_or_arithmetic(&ast, root));

    let mut slots = TypeSlots::for_ast(&ast);
    set_type_for_integers(&ast, &mut slots, root, TypeId::FLOAT64);
    assert_eq!(slots.get(three), Some(TypeId::FLOAT64));
    assert_eq!(slots.get(two), None);
}

#[test]
fn propagation_is_idempotent() {
    let mut ast = Ast::new();
    let a = ast.integer(7);
    let b = ast.integer(8);
    let root = ast.binary(BinaryOp::Sub, a, b);

    let mut first = TypeSlots::for_ast(&ast);
    set_type_for_integers(&ast, &mut first, root, TypeId::INT);
    let mut second = first.clone();
    set_type_for_integers(&ast, &mut second, root, TypeId::INT);

    assert_eq!(first, second);
}

#[test]
fn literal_adopts_typed_sibling_width() {
    // price > 10 * 2, with price: *float32
    let mut b = TypeRegistry::builder();
    let float32 = b.numeric(NumericKind::Float32);
    let float32_ptr = b.pointer(float32).unwrap();
    let reg = b.build().unwrap();

    let mut ast = Ast::new();
    let price = ast.identifier("price");
    let ten = ast.integer(10);
    let two = ast.integer(2);
    let product = ast.binary(BinaryOp::Mul, ten, two);
    let mut slots = TypeSlots::for_ast(&ast);
    slots.set(price, float32_ptr);

    assert!(balance_literal_operands(&ast, &mut slots, &reg, price, product));
    assert_eq!(slots.get(ten), Some(float32));
    assert_eq!(slots.get(two), Some(float32));

    let mut swapped = TypeSlots::for_ast(&ast);
    swapped.set(price, float32);
    assert!(balance_literal_operands(&ast, &mut swapped, &reg, product, price));
    assert_eq!(swapped.get(ten), Some(float32));
}

#[test]
fn balance_needs_a_concrete_numeric_sibling() {
    let reg = TypeRegistry::default();
    let mut ast = Ast::new();
    let name = ast.identifier("name");
    let meta = ast.identifier("meta");
    let untyped = ast.identifier("untyped");
    let one = ast.integer(1);
    let two = ast.integer(2);
    let mut slots = TypeSlots::for_ast(&ast);
    slots.set(name, TypeId::STRING);
    slots.set(meta, TypeId::ANY);

    assert!(!balance_literal_operands(&ast, &mut slots, &reg, name, one));
    assert!(!balance_literal_operands(&ast, &mut slots, &reg, meta, one));
    assert!(!balance_literal_operands(&ast, &mut slots, &reg, untyped, one));
    assert!(!balance_literal_operands(&ast, &mut slots, &reg, one, two));
    assert_eq!(slots.get(one), None);
}

#[test]
fn default_literal_types() {
    assert_eq!(default_literal_type(&NodeKind::Integer(1)), Some(TypeId::INT));
    assert_eq!(default_literal_type(&NodeKind::Float(1.0)), Some(TypeId::FLOAT64));
    assert_eq!(default_literal_type(&NodeKind::String("s".into())), Some(TypeId::STRING));
    assert_eq!(default_literal_type(&NodeKind::Bool(false)), Some(TypeId::BOOL));
    assert_eq!(default_literal_type(&NodeKind::Nil), Some(TypeId::NIL));
    assert_eq!(default_literal_type(&NodeKind::Identifier("x".into())), None);
}

#[test]
fn defaults_do_not_override_propagated_widths() {
    let mut b = TypeRegistry::builder();
    let uint8 = b.numeric(NumericKind::Uint8);

    let mut ast = Ast::new();
    let one = ast.integer(1);
    let two = ast.integer(2);
    let sum = ast.binary(BinaryOp::Add, one, two);
    let text = ast.string("hi");
    let mut slots = TypeSlots::for_ast(&ast);
    slots.set(two, uint8);

    assert_eq!(assign_default_literal_types(&ast, &mut slots), 2);
    assert_eq!(slots.get(one), Some(TypeId::INT));
    assert_eq!(slots.get(two), Some(uint8));
    assert_eq!(slots.get(text), Some(TypeId::STRING));
    assert_eq!(slots.get(sum), None);
}
