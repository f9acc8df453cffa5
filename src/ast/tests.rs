//! Unit tests for the type system and tree construction.

use super::{
    builder::AstBuilder,
    expressions::Operation,
    types::{Type, TypeError, INTRINSICS},
};
use crate::Position;

const ARITHMETIC: [Operation; 4] = [Operation::Add, Operation::Sub, Operation::Mult, Operation::Div];
const COMPARISONS: [Operation; 6] = [
    Operation::Gt,
    Operation::Ge,
    Operation::Lt,
    Operation::Le,
    Operation::Eq,
    Operation::Ne,
];

fn message(error: TypeError) -> String {
    match error {
        TypeError::Mismatch(message) => message,
        TypeError::Poisoned => panic!("Expected a fresh mismatch"),
    }
}

#[test]
fn test_int_arithmetic_and_comparison() {
    for op in ARITHMETIC {
        assert_eq!(Type::Int.binary(op, &Type::Int), Ok(Type::Int), "{}", op);
    }
    for op in COMPARISONS {
        assert_eq!(Type::Int.binary(op, &Type::Int), Ok(Type::Bool), "{}", op);
    }
}

#[test]
fn test_mixing_int_and_bool_fails() {
    for op in ARITHMETIC.iter().chain(COMPARISONS.iter()) {
        assert!(Type::Int.binary(*op, &Type::Bool).is_err(), "int {} bool", op);
        assert!(Type::Bool.binary(*op, &Type::Int).is_err(), "bool {} int", op);
        assert!(Type::Bool.binary(*op, &Type::Bool).is_err(), "bool {} bool", op);
    }
}

#[test]
fn test_logic_requires_bool() {
    assert_eq!(Type::Bool.binary(Operation::LogicAnd, &Type::Bool), Ok(Type::Bool));
    assert_eq!(Type::Bool.binary(Operation::LogicOr, &Type::Bool), Ok(Type::Bool));
    assert_eq!(Type::Bool.not(), Ok(Type::Bool));

    assert!(Type::Int.binary(Operation::LogicAnd, &Type::Int).is_err());
    assert!(Type::Bool.binary(Operation::LogicOr, &Type::Int).is_err());
    assert_eq!(message(Type::Int.not().unwrap_err()), "cannot negate int");
}

#[test]
fn test_operator_messages() {
    assert_eq!(
        message(Type::Int.add(&Type::Bool).unwrap_err()),
        "cannot add int with bool"
    );
    assert_eq!(
        message(Type::Bool.sub(&Type::Int).unwrap_err()),
        "cannot subtract bool from int"
    );
    assert_eq!(
        message(Type::Bool.compare(&Type::Bool).unwrap_err()),
        "cannot compare bool with bool"
    );
    assert_eq!(
        message(Type::Int.and(&Type::Int).unwrap_err()),
        "cannot compute int and int"
    );
}

#[test]
fn test_void_supports_nothing() {
    assert!(Type::Void.add(&Type::Void).is_err());
    assert!(Type::Void.not().is_err());
    assert!(Type::Void.compare(&Type::Void).is_err());
    assert!(Type::Void.assign(&Type::Void).is_err());
    assert!(Type::Void.index(&Type::Int).is_err());
    assert!(Type::Void.call(&Type::TypeList(vec![])).is_err());
}

#[test]
fn test_assign() {
    assert_eq!(Type::Int.assign(&Type::Int), Ok(Type::Int));
    assert_eq!(Type::Bool.assign(&Type::Bool), Ok(Type::Bool));
    assert_eq!(
        message(Type::Int.assign(&Type::Bool).unwrap_err()),
        "cannot assign bool to int"
    );
}

#[test]
fn test_array_index_and_assign() {
    let array = Type::array(Type::Bool, 10);

    assert_eq!(array.index(&Type::Int), Ok(Type::Bool));
    assert_eq!(
        message(array.index(&Type::Bool).unwrap_err()),
        "cannot index array[10,bool] with bool"
    );

    // Extents are not part of equivalence
    assert_eq!(array.assign(&Type::array(Type::Bool, 3)), Ok(array.clone()));
    assert!(array.assign(&Type::array(Type::Int, 10)).is_err());
}

#[test]
fn test_equivalence_is_structural() {
    assert!(Type::array(Type::Int, 1).equivalent(&Type::array(Type::Int, 99)));
    assert!(!Type::array(Type::Int, 1).equivalent(&Type::Int));

    let f = Type::func(vec![Type::Int, Type::Bool], Type::Void);
    assert!(f.equivalent(&Type::func(vec![Type::Int, Type::Bool], Type::Void)));
    assert!(!f.equivalent(&Type::func(vec![Type::Bool, Type::Int], Type::Void)));
    assert!(!f.equivalent(&Type::func(vec![Type::Int, Type::Bool], Type::Int)));

    assert!(Type::TypeList(vec![Type::Int]).equivalent(&Type::TypeList(vec![Type::Int])));
    assert!(!Type::TypeList(vec![Type::Int]).equivalent(&Type::TypeList(vec![])));
}

#[test]
fn test_call_arity_mismatch() {
    let f = Type::func(vec![Type::Int, Type::Int], Type::Int);

    let too_few = f.call(&Type::TypeList(vec![Type::Int])).unwrap_err();
    assert_eq!(
        message(too_few),
        "Wrong number of arguments. Expected 2 but got 1."
    );

    let too_many = f
        .call(&Type::TypeList(vec![Type::Int, Type::Int, Type::Int]))
        .unwrap_err();
    assert_eq!(
        message(too_many),
        "Wrong number of arguments. Expected 2 but got 3."
    );
}

#[test]
fn test_call_argument_mismatch() {
    let f = Type::func(vec![Type::Int, Type::Bool], Type::Int);

    assert_eq!(f.call(&Type::TypeList(vec![Type::Int, Type::Bool])), Ok(Type::Int));
    assert_eq!(
        message(f.call(&Type::TypeList(vec![Type::Int, Type::Int])).unwrap_err()),
        "Mismatch in Types of Argument. Expected bool but got int"
    );
}

#[test]
fn test_call_requires_type_list() {
    let f = Type::func(vec![], Type::Void);
    assert!(message(f.call(&Type::Int).unwrap_err()).starts_with("Arguments need to be a TypeList"));
    assert_eq!(
        message(Type::Int.call(&Type::TypeList(vec![])).unwrap_err()),
        "cannot call int using TypeList()"
    );
}

#[test]
fn test_type_display() {
    assert_eq!(Type::array(Type::Int, 4).to_string(), "array[4,int]");
    assert_eq!(
        Type::func(vec![Type::Int, Type::Bool], Type::Void).to_string(),
        "func(TypeList(int, bool)):void"
    );
}

#[test]
fn test_intrinsics_table() {
    let names: Vec<&str> = INTRINSICS.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec!["readInt", "readChar", "printBool", "printInt", "printChar", "println"]
    );

    let (_, print_int) = &INTRINSICS[3];
    assert_eq!(print_int, &Type::func(vec![Type::Int], Type::Void));
}

#[test]
fn test_builder_allocates_unique_ids() {
    let mut builder = AstBuilder::new();
    let position = Position::new(1, 1);

    let one = builder.int(position, 1);
    let two = builder.int(position, 2);
    let sum = builder.binary(position, Operation::Add, one.clone(), two.clone());

    assert_ne!(one.id(), two.id());
    assert_ne!(sum.id(), one.id());
    assert_ne!(sum.id(), two.id());
}
