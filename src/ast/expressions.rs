use std::fmt::Display;

use crate::Position;

use super::ast::NodeId;

/// Operator tags as produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
    Add,
    Sub,
    Mult,
    Div,
    LogicAnd,
    LogicOr,
    LogicNot,
}

impl Operation {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operation::Ge
                | Operation::Gt
                | Operation::Le
                | Operation::Lt
                | Operation::Eq
                | Operation::Ne
        )
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Operation::Ge => ">=",
            Operation::Gt => ">",
            Operation::Le => "<=",
            Operation::Lt => "<",
            Operation::Eq => "==",
            Operation::Ne => "!=",
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mult => "*",
            Operation::Div => "/",
            Operation::LogicAnd => "&&",
            Operation::LogicOr => "||",
            Operation::LogicNot => "!",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    LiteralInt(LiteralInt),
    LiteralBool(LiteralBool),
    VarAccess(VarAccess),
    ArrayAccess(ArrayAccess),
    Call(Call),
    Op(OpExpr),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::LiteralInt(literal) => literal.id,
            Expr::LiteralBool(literal) => literal.id,
            Expr::VarAccess(access) => access.id,
            Expr::ArrayAccess(access) => access.id,
            Expr::Call(call) => call.id,
            Expr::Op(op) => op.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Expr::LiteralInt(literal) => literal.position,
            Expr::LiteralBool(literal) => literal.position,
            Expr::VarAccess(access) => access.position,
            Expr::ArrayAccess(access) => access.position,
            Expr::Call(call) => call.position,
            Expr::Op(op) => op.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralInt {
    pub id: NodeId,
    pub position: Position,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralBool {
    pub id: NodeId,
    pub position: Position,
    pub value: bool,
}

/// A read of, or a write to, a named variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAccess {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
}

/// `name[index]`; the node id binds `name` and carries the element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub id: NodeId,
    pub position: Position,
    pub callee: String,
    pub arguments: Vec<Expr>,
}

/// A unary (`right` is `None`, only `!`) or binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpExpr {
    pub id: NodeId,
    pub position: Position,
    pub op: Operation,
    pub left: Box<Expr>,
    pub right: Option<Box<Expr>>,
}
