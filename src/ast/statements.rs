use std::slice::Iter;

use crate::Position;

use super::{
    ast::{NodeId, VarDecl},
    expressions::{ArrayAccess, Call, Expr, VarAccess},
};

#[derive(Debug, Clone, PartialEq)]
pub struct StatementList {
    pub id: NodeId,
    pub position: Position,
    pub statements: Vec<Stmt>,
}

impl StatementList {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assignment(Assignment),
    Call(Call),
    IfElse(IfElseBranch),
    While(WhileLoop),
    Break(Break),
    Continue(Continue),
    Return(Return),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::VarDecl(decl) => decl.id,
            Stmt::Assignment(assignment) => assignment.id,
            Stmt::Call(call) => call.id,
            Stmt::IfElse(branch) => branch.id,
            Stmt::While(loop_) => loop_.id,
            Stmt::Break(brk) => brk.id,
            Stmt::Continue(cont) => cont.id,
            Stmt::Return(ret) => ret.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Stmt::VarDecl(decl) => decl.position,
            Stmt::Assignment(assignment) => assignment.position,
            Stmt::Call(call) => call.position,
            Stmt::IfElse(branch) => branch.position,
            Stmt::While(loop_) => loop_.position,
            Stmt::Break(brk) => brk.position,
            Stmt::Continue(cont) => cont.position,
            Stmt::Return(ret) => ret.position,
        }
    }
}

/// The left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Var(VarAccess),
    Array(ArrayAccess),
}

impl Location {
    pub fn id(&self) -> NodeId {
        match self {
            Location::Var(access) => access.id,
            Location::Array(access) => access.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Location::Var(access) => access.position,
            Location::Array(access) => access.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: NodeId,
    pub position: Position,
    pub location: Location,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElseBranch {
    pub id: NodeId,
    pub position: Position,
    pub condition: Expr,
    pub then_block: StatementList,
    pub else_block: Option<StatementList>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub id: NodeId,
    pub position: Position,
    pub condition: Expr,
    pub body: StatementList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub id: NodeId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Continue {
    pub id: NodeId,
    pub position: Position,
}

/// `return;` has no value and is only legal in `void` functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub id: NodeId,
    pub position: Position,
    pub value: Option<Expr>,
}
