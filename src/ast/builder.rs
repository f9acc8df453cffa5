//! Node construction with id allocation.
//!
//! The parser builds trees through [`AstBuilder`] so that every node gets a
//! fresh [`NodeId`]. Building two trees with one builder keeps their ids
//! disjoint.

use crate::Position;

use super::{
    ast::{ArrayDecl, Decl, DeclList, FunctionDef, NodeId, Parameter, VarDecl},
    expressions::{ArrayAccess, Call, Expr, LiteralBool, LiteralInt, OpExpr, Operation, VarAccess},
    statements::{
        Assignment, Break, Continue, IfElseBranch, Location, Return, StatementList, Stmt,
        WhileLoop,
    },
    types::Type,
};

#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder { next_id: 0 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn program(&mut self, decls: Vec<Decl>) -> DeclList {
        DeclList {
            id: self.next_id(),
            position: Position::new(1, 1),
            decls,
        }
    }

    // Declarations

    pub fn var_decl(&mut self, position: Position, name: &str, ty: Type) -> VarDecl {
        VarDecl {
            id: self.next_id(),
            position,
            name: name.to_string(),
            ty,
        }
    }

    pub fn global(&mut self, position: Position, name: &str, ty: Type) -> Decl {
        Decl::Var(self.var_decl(position, name, ty))
    }

    pub fn global_array(&mut self, position: Position, name: &str, base: Type, extent: i64) -> Decl {
        Decl::Array(ArrayDecl {
            id: self.next_id(),
            position,
            name: name.to_string(),
            ty: Type::array(base, extent),
        })
    }

    pub fn param(&mut self, position: Position, name: &str, ty: Type) -> Parameter {
        Parameter {
            id: self.next_id(),
            position,
            name: name.to_string(),
            ty,
        }
    }

    pub fn function(
        &mut self,
        position: Position,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: Type,
        body: StatementList,
    ) -> Decl {
        Decl::Function(FunctionDef {
            id: self.next_id(),
            position,
            name: name.to_string(),
            parameters,
            return_type,
            body,
        })
    }

    // Statements

    pub fn block(&mut self, position: Position, statements: Vec<Stmt>) -> StatementList {
        StatementList {
            id: self.next_id(),
            position,
            statements,
        }
    }

    pub fn local(&mut self, position: Position, name: &str, ty: Type) -> Stmt {
        Stmt::VarDecl(self.var_decl(position, name, ty))
    }

    pub fn assign(&mut self, position: Position, name: &str, value: Expr) -> Stmt {
        let location = Location::Var(VarAccess {
            id: self.next_id(),
            position,
            name: name.to_string(),
        });
        Stmt::Assignment(Assignment {
            id: self.next_id(),
            position,
            location,
            value,
        })
    }

    pub fn assign_index(&mut self, position: Position, name: &str, index: Expr, value: Expr) -> Stmt {
        let location = Location::Array(ArrayAccess {
            id: self.next_id(),
            position,
            name: name.to_string(),
            index: Box::new(index),
        });
        Stmt::Assignment(Assignment {
            id: self.next_id(),
            position,
            location,
            value,
        })
    }

    pub fn call_stmt(&mut self, position: Position, callee: &str, arguments: Vec<Expr>) -> Stmt {
        Stmt::Call(self.new_call(position, callee, arguments))
    }

    pub fn if_else(
        &mut self,
        position: Position,
        condition: Expr,
        then_block: StatementList,
        else_block: Option<StatementList>,
    ) -> Stmt {
        Stmt::IfElse(IfElseBranch {
            id: self.next_id(),
            position,
            condition,
            then_block,
            else_block,
        })
    }

    pub fn while_loop(&mut self, position: Position, condition: Expr, body: StatementList) -> Stmt {
        Stmt::While(WhileLoop {
            id: self.next_id(),
            position,
            condition,
            body,
        })
    }

    pub fn ret(&mut self, position: Position, value: Option<Expr>) -> Stmt {
        Stmt::Return(Return {
            id: self.next_id(),
            position,
            value,
        })
    }

    pub fn brk(&mut self, position: Position) -> Stmt {
        Stmt::Break(Break {
            id: self.next_id(),
            position,
        })
    }

    pub fn cont(&mut self, position: Position) -> Stmt {
        Stmt::Continue(Continue {
            id: self.next_id(),
            position,
        })
    }

    // Expressions

    pub fn int(&mut self, position: Position, value: i64) -> Expr {
        Expr::LiteralInt(LiteralInt {
            id: self.next_id(),
            position,
            value,
        })
    }

    pub fn boolean(&mut self, position: Position, value: bool) -> Expr {
        Expr::LiteralBool(LiteralBool {
            id: self.next_id(),
            position,
            value,
        })
    }

    pub fn var(&mut self, position: Position, name: &str) -> Expr {
        Expr::VarAccess(VarAccess {
            id: self.next_id(),
            position,
            name: name.to_string(),
        })
    }

    pub fn index(&mut self, position: Position, name: &str, index: Expr) -> Expr {
        Expr::ArrayAccess(ArrayAccess {
            id: self.next_id(),
            position,
            name: name.to_string(),
            index: Box::new(index),
        })
    }

    pub fn call(&mut self, position: Position, callee: &str, arguments: Vec<Expr>) -> Expr {
        Expr::Call(self.new_call(position, callee, arguments))
    }

    pub fn binary(&mut self, position: Position, op: Operation, left: Expr, right: Expr) -> Expr {
        Expr::Op(OpExpr {
            id: self.next_id(),
            position,
            op,
            left: Box::new(left),
            right: Some(Box::new(right)),
        })
    }

    pub fn not(&mut self, position: Position, operand: Expr) -> Expr {
        Expr::Op(OpExpr {
            id: self.next_id(),
            position,
            op: Operation::LogicNot,
            left: Box::new(operand),
            right: None,
        })
    }

    fn new_call(&mut self, position: Position, callee: &str, arguments: Vec<Expr>) -> Call {
        Call {
            id: self.next_id(),
            position,
            callee: callee.to_string(),
            arguments,
        }
    }
}
