//! Unit tests for the type checker.

use super::type_checker::TypeChecker;
use crate::{
    ast::{
        ast::{Decl, DeclList},
        builder::AstBuilder,
        expressions::Operation,
        statements::Stmt,
        types::{Type, TypeError},
    },
    symbols::resolver::resolve,
    Position,
};

fn p(line: u32, column: u32) -> Position {
    Position::new(line, column)
}

/// Runs resolution and checking, returning the rendered diagnostics.
fn diagnostics(ast: &DeclList) -> Vec<String> {
    match TypeChecker::new().check(ast, resolve(ast)) {
        Ok(_) => vec![],
        Err(error) => error
            .diagnostics()
            .iter()
            .map(|error| error.to_string())
            .collect(),
    }
}

fn main_with(b: &mut AstBuilder, statements: Vec<Stmt>) -> Decl {
    let body = b.block(p(1, 20), statements);
    b.function(p(1, 1), "main", vec![], Type::Void, body)
}

#[test]
fn test_well_typed_program_is_annotated() {
    // func main() : void { var x : int; x = 1 + 2; printInt(x); }
    let mut b = AstBuilder::new();
    let decl = b.local(p(2, 3), "x", Type::Int);
    let one = b.int(p(3, 7), 1);
    let two = b.int(p(3, 11), 2);
    let sum = b.binary(p(3, 9), Operation::Add, one, two);
    let assign = b.assign(p(3, 3), "x", sum.clone());
    let read = b.var(p(4, 12), "x");
    let print = b.call_stmt(p(4, 3), "printInt", vec![read]);
    let main = main_with(&mut b, vec![decl, assign, print.clone()]);
    let ast = b.program(vec![main]);

    let typed = TypeChecker::new()
        .check(&ast, resolve(&ast))
        .expect("program should check");

    assert_eq!(typed.type_of(sum.id()), Some(&Type::Int));
    assert_eq!(typed.type_of(print.id()), Some(&Type::Void));
    assert!(!typed.types.is_empty());
}

#[test]
fn test_condition_must_be_bool() {
    let mut b = AstBuilder::new();
    let condition = b.int(p(2, 7), 1);
    let then_block = b.block(p(2, 10), vec![]);
    let branch = b.if_else(p(2, 3), condition, then_block, None);
    let loop_condition = b.int(p(3, 10), 0);
    let loop_body = b.block(p(3, 13), vec![]);
    let loop_ = b.while_loop(p(3, 3), loop_condition, loop_body);
    let main = main_with(&mut b, vec![branch, loop_]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(2:3)[Condition of if must be bool, not int.]",
            "TypeError(3:3)[Condition of while must be bool, not int.]",
        ]
    );
}

#[test]
fn test_missing_return_on_some_path() {
    // func f(b : bool) : int { if (b) { return 1; } }
    let mut b = AstBuilder::new();
    let param = b.param(p(1, 8), "b", Type::Bool);
    let condition = b.var(p(2, 7), "b");
    let one = b.int(p(2, 21), 1);
    let ret = b.ret(p(2, 14), Some(one));
    let then_block = b.block(p(2, 12), vec![ret]);
    let branch = b.if_else(p(2, 3), condition, then_block, None);
    let body = b.block(p(1, 22), vec![branch]);
    let f = b.function(p(1, 1), "f", vec![param], Type::Int, body);
    let main = main_with(&mut b, vec![]);
    let ast = b.program(vec![f, main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(1:1)[f does not return on every path.]"]
    );
}

#[test]
fn test_if_else_returning_on_both_paths() {
    let mut b = AstBuilder::new();
    let param = b.param(p(1, 8), "b", Type::Bool);
    let condition = b.var(p(2, 7), "b");
    let one = b.int(p(2, 21), 1);
    let then_ret = b.ret(p(2, 14), Some(one));
    let then_block = b.block(p(2, 12), vec![then_ret]);
    let zero = b.int(p(3, 17), 0);
    let else_ret = b.ret(p(3, 10), Some(zero));
    let else_block = b.block(p(3, 8), vec![else_ret]);
    let branch = b.if_else(p(2, 3), condition, then_block, Some(else_block));
    let body = b.block(p(1, 22), vec![branch]);
    let f = b.function(p(1, 1), "f", vec![param], Type::Int, body);
    let main = main_with(&mut b, vec![]);
    let ast = b.program(vec![f, main]);

    assert!(diagnostics(&ast).is_empty());
}

#[test]
fn test_return_inside_loop_does_not_count() {
    // func f() : int { while (true) { return 1; } }
    let mut b = AstBuilder::new();
    let condition = b.boolean(p(2, 10), true);
    let one = b.int(p(2, 25), 1);
    let ret = b.ret(p(2, 18), Some(one));
    let loop_body = b.block(p(2, 16), vec![ret]);
    let loop_ = b.while_loop(p(2, 3), condition, loop_body);
    let body = b.block(p(1, 18), vec![loop_]);
    let f = b.function(p(1, 1), "f", vec![], Type::Int, body);
    let main = main_with(&mut b, vec![]);
    let ast = b.program(vec![f, main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(1:1)[f does not return on every path.]"]
    );
}

#[test]
fn test_wrong_argument_count() {
    let mut b = AstBuilder::new();
    let one = b.int(p(2, 12), 1);
    let two = b.int(p(2, 15), 2);
    let print = b.call_stmt(p(2, 3), "printInt", vec![one, two]);
    let main = main_with(&mut b, vec![print]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(2:3)[Wrong number of arguments. Expected 1 but got 2.]"]
    );
}

#[test]
fn test_wrong_argument_type() {
    let mut b = AstBuilder::new();
    let truth = b.boolean(p(2, 12), true);
    let print = b.call_stmt(p(2, 3), "printInt", vec![truth]);
    let main = main_with(&mut b, vec![print]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(2:3)[Mismatch in Types of Argument. Expected int but got bool]"]
    );
}

#[test]
fn test_main_signature() {
    let mut b = AstBuilder::new();
    let param = b.param(p(1, 11), "n", Type::Int);
    let zero = b.int(p(2, 10), 0);
    let ret = b.ret(p(2, 3), Some(zero));
    let body = b.block(p(1, 25), vec![ret]);
    let main = b.function(p(1, 1), "main", vec![param], Type::Int, body);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(1:1)[main must return void, not int.]",
            "TypeError(1:1)[main must not take parameters, found 1.]",
        ]
    );
}

#[test]
fn test_declarations_must_be_scalar() {
    let mut b = AstBuilder::new();
    let global = b.global(p(1, 1), "nothing", Type::Void);
    let nested = b.global_array(p(2, 1), "grid", Type::array(Type::Int, 3), 3);
    let local = b.local(p(4, 3), "row", Type::array(Type::Int, 3));
    let main = main_with(&mut b, vec![local]);
    let ast = b.program(vec![global, nested, main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(1:1)[nothing has type void, expected int or bool.]",
            "TypeError(2:1)[grid has type array[3,array[3,int]], expected int or bool.]",
            "TypeError(4:3)[row has type array[3,int], expected int or bool.]",
        ]
    );
}

#[test]
fn test_array_extent_must_be_positive() {
    let mut b = AstBuilder::new();
    let empty = b.global_array(p(1, 1), "empty", Type::Int, 0);
    let negative = b.global_array(p(2, 1), "negative", Type::Bool, -2);
    let fine = b.global_array(p(3, 1), "fine", Type::Int, 1);
    let main = main_with(&mut b, vec![]);
    let ast = b.program(vec![empty, negative, fine, main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(1:1)[empty must have a positive extent, not 0.]",
            "TypeError(2:1)[negative must have a positive extent, not -2.]",
        ]
    );
}

#[test]
fn test_unreachable_statement_reported_once() {
    let mut b = AstBuilder::new();
    let ret = b.ret(p(2, 3), None);
    let first = b.call_stmt(p(3, 3), "println", vec![]);
    let second = b.call_stmt(p(4, 3), "println", vec![]);
    let main = main_with(&mut b, vec![ret, first, second]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(3:3)[Unreachable statement after return.]"]
    );
}

#[test]
fn test_break_outside_loop() {
    let mut b = AstBuilder::new();
    let brk = b.brk(p(2, 3));
    let cont = b.cont(p(3, 3));
    let main = main_with(&mut b, vec![brk, cont]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(2:3)[break outside of a loop.]",
            "TypeError(3:3)[continue outside of a loop.]",
        ]
    );
}

#[test]
fn test_break_inside_nested_if_in_loop() {
    let mut b = AstBuilder::new();
    let condition = b.boolean(p(2, 10), true);
    let inner_condition = b.boolean(p(3, 9), false);
    let brk = b.brk(p(3, 17));
    let then_block = b.block(p(3, 15), vec![brk]);
    let branch = b.if_else(p(3, 5), inner_condition, then_block, None);
    let loop_body = b.block(p(2, 16), vec![branch]);
    let loop_ = b.while_loop(p(2, 3), condition, loop_body);
    let main = main_with(&mut b, vec![loop_]);
    let ast = b.program(vec![main]);

    assert!(diagnostics(&ast).is_empty());
}

#[test]
fn test_return_value_checks() {
    // func f() : int { return; }
    // func main() : void { return 1; }
    let mut b = AstBuilder::new();
    let bare = b.ret(p(1, 20), None);
    let body = b.block(p(1, 18), vec![bare]);
    let f = b.function(p(1, 1), "f", vec![], Type::Int, body);
    let one = b.int(p(2, 29), 1);
    let valued = b.ret(p(2, 22), Some(one));
    let main = main_with(&mut b, vec![valued]);
    let ast = b.program(vec![f, main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(1:20)[f must return a value of type int.]",
            "TypeError(2:22)[cannot assign int to void]",
        ]
    );
}

#[test]
fn test_errors_do_not_cascade() {
    // printInt((1 + true) * 2);
    let mut b = AstBuilder::new();
    let one = b.int(p(2, 13), 1);
    let truth = b.boolean(p(2, 17), true);
    let sum = b.binary(p(2, 15), Operation::Add, one, truth);
    let two = b.int(p(2, 25), 2);
    let product = b.binary(p(2, 23), Operation::Mult, sum.clone(), two);
    let print = b.call_stmt(p(2, 3), "printInt", vec![product.clone()]);
    let main = main_with(&mut b, vec![print.clone()]);
    let ast = b.program(vec![main]);

    let mut checker = TypeChecker::new();
    let resolutions = resolve(&ast);
    assert_eq!(
        checker.check_expr(&product, &resolutions),
        Err(TypeError::Poisoned)
    );

    assert_eq!(checker.errors.len(), 1);
    assert_eq!(
        checker.errors[0].to_string(),
        "TypeError(2:15)[cannot add int with bool]"
    );
    assert!(matches!(
        checker.types.get(sum.id()),
        Some(Err(TypeError::Mismatch(_)))
    ));
    assert_eq!(
        checker.types.get(product.id()),
        Some(&Err(TypeError::Poisoned))
    );

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(2:15)[cannot add int with bool]"]
    );
}

#[test]
fn test_unresolved_name_poisons_silently() {
    // x = y + 1; with neither declared
    let mut b = AstBuilder::new();
    let y = b.var(p(2, 7), "y");
    let one = b.int(p(2, 11), 1);
    let sum = b.binary(p(2, 9), Operation::Add, y, one);
    let assign = b.assign(p(2, 3), "x", sum);
    let main = main_with(&mut b, vec![assign]);
    let ast = b.program(vec![main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "ResolveSymbolError(2:3)[Could not find x.]",
            "ResolveSymbolError(2:7)[Could not find y.]",
        ]
    );
}

#[test]
fn test_array_indexing() {
    let mut b = AstBuilder::new();
    let grid = b.global_array(p(1, 1), "grid", Type::Bool, 4);
    let index = b.int(p(2, 8), 0);
    let truth = b.boolean(p(2, 13), true);
    let store = b.assign_index(p(2, 3), "grid", index, truth);
    let bad_index = b.boolean(p(3, 17), true);
    let element = b.index(p(3, 12), "grid", bad_index);
    let print = b.call_stmt(p(3, 3), "printBool", vec![element]);
    let main = main_with(&mut b, vec![store, print]);
    let ast = b.program(vec![grid, main]);

    assert_eq!(
        diagnostics(&ast),
        vec!["TypeError(3:12)[cannot index array[4,bool] with bool]"]
    );
}

#[test]
fn test_array_must_be_indexed() {
    let mut b = AstBuilder::new();
    let grid = b.global_array(p(1, 1), "grid", Type::Int, 2);
    let other = b.global_array(p(2, 1), "other", Type::Int, 2);
    let source = b.var(p(3, 10), "other");
    let assign = b.assign(p(3, 3), "grid", source);
    let main = main_with(&mut b, vec![assign]);
    let ast = b.program(vec![grid, other, main]);

    assert_eq!(
        diagnostics(&ast),
        vec![
            "TypeError(3:3)[grid has type array[2,int] and must be indexed.]",
            "TypeError(3:10)[other has type array[2,int] and must be indexed.]",
        ]
    );
}

#[test]
fn test_recursive_call_checks() {
    let mut b = AstBuilder::new();
    let n = b.param(p(1, 10), "n", Type::Int);
    let arg = b.var(p(2, 15), "n");
    let call = b.call(p(2, 10), "fact", vec![arg]);
    let ret = b.ret(p(2, 3), Some(call.clone()));
    let body = b.block(p(1, 25), vec![ret]);
    let fact = b.function(p(1, 1), "fact", vec![n], Type::Int, body);
    let main = main_with(&mut b, vec![]);
    let ast = b.program(vec![fact, main]);

    let typed = TypeChecker::new()
        .check(&ast, resolve(&ast))
        .expect("program should check");
    assert_eq!(typed.type_of(call.id()), Some(&Type::Int));
}
