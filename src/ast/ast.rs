use std::slice::Iter;

use crate::Position;

use super::{statements::StatementList, types::Type};

/// Identity of a syntax node, unique within one tree.
///
/// Later stages attach their results (resolved symbols, types) to nodes
/// through side tables keyed by this id rather than by mutating the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Root of a compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclList {
    pub id: NodeId,
    pub position: Position,
    pub decls: Vec<Decl>,
}

impl DeclList {
    pub fn iter(&self) -> Iter<'_, Decl> {
        self.decls.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Array(ArrayDecl),
    Function(FunctionDef),
}

impl Decl {
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Var(decl) => decl.id,
            Decl::Array(decl) => decl.id,
            Decl::Function(def) => def.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Var(decl) => &decl.name,
            Decl::Array(decl) => &decl.name,
            Decl::Function(def) => &def.name,
        }
    }
}

/// A scalar variable, either global or local to a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    pub ty: Type,
}

/// A global array; `ty` is the full `Type::Array`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: StatementList,
}

impl FunctionDef {
    /// The declared signature, `func(params):ret`.
    pub fn signature(&self) -> Type {
        Type::func(
            self.parameters.iter().map(|param| param.ty.clone()).collect(),
            self.return_type.clone(),
        )
    }
}
