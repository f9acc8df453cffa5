//! Unit tests for the instruction graph.

use la_arena::Arena;

use super::ir::{
    BinaryOp, CompareOp, Function, GlobalDecl, InstKind, LocalVar, Program, Temp, Value,
};
use crate::{
    ast::{expressions::Operation, types::Type},
    symbols::symbol_table::Symbol,
};

#[test]
fn test_arity_by_kind() {
    let predicate = LocalVar(0);
    assert_eq!(InstKind::Jump { predicate }.arity(), 2);
    assert_eq!(InstKind::Return { value: None }.arity(), 0);
    assert_eq!(InstKind::Nop.arity(), 1);
    assert_eq!(
        InstKind::Copy {
            dst: predicate,
            src: Value::BooleanConstant(true)
        }
        .arity(),
        1
    );
}

#[test]
fn test_temporaries_are_numbered_per_kind() {
    let mut function = Function::new("f", Type::func(vec![], Type::Void));
    let a = function.new_local(Type::Int);
    let b = function.new_local(Type::Bool);
    let address = function.new_address(Type::Int);

    assert_eq!(a, LocalVar(0));
    assert_eq!(b, LocalVar(1));
    assert_eq!(function.local_type(b), &Type::Bool);
    assert_eq!(function.address_type(address), &Type::Int);
    assert_ne!(Temp::from(a), Temp::from(address));
    assert_eq!(Value::Local(a).temp(), Some(Temp::Local(a)));
    assert_eq!(Value::IntegerConstant(3).temp(), None);
}

#[test]
fn test_reachable_survives_cycles() {
    // entry -> condition -> jump -(1)-> body -> condition
    //                            -(0)-> exit
    let mut function = Function::new("loop", Type::func(vec![], Type::Void));
    let predicate = function.new_local(Type::Bool);
    let condition = function.add(InstKind::Copy {
        dst: predicate,
        src: Value::BooleanConstant(false),
    });
    let jump = function.add(InstKind::Jump { predicate });
    let body = function.add(InstKind::Nop);
    let exit = function.add(InstKind::Return { value: None });
    let unreachable = function.add(InstKind::Nop);

    function.link(function.entry, condition);
    function.link(condition, jump);
    function.set_edge(jump, 0, exit);
    function.set_edge(jump, 1, body);
    function.link(body, condition);
    function.link(unreachable, exit);

    let order = function.reachable();
    assert_eq!(order, vec![function.entry, condition, jump, exit, body]);
    assert!(!order.contains(&unreachable));
    assert_eq!(function.get(jump).successors().collect::<Vec<_>>(), vec![exit, body]);
}

#[test]
fn test_operator_mapping() {
    assert_eq!(BinaryOp::from_operation(Operation::Mult), Some(BinaryOp::Mul));
    assert_eq!(BinaryOp::from_operation(Operation::Lt), None);
    assert_eq!(CompareOp::from_operation(Operation::Ne), Some(CompareOp::Ne));
    assert_eq!(CompareOp::from_operation(Operation::LogicOr), None);
}

#[test]
fn test_program_lookups() {
    let mut symbols = Arena::new();
    let counter = symbols.alloc(Symbol {
        name: "counter".to_string(),
        ty: Ok(Type::Int),
    });
    let program = Program {
        globals: vec![GlobalDecl {
            symbol: counter,
            count: 1,
        }],
        functions: vec![Function::new("main", Type::func(vec![], Type::Void))],
        symbols,
    };

    assert_eq!(program.symbol_name(counter), "counter");
    assert!(program.function("main").is_some());
    assert!(program.function("missing").is_none());
}
