use la_arena::Arena;
use rustc_hash::FxHashMap;

use crate::{
    ast::{
        ast::{Decl, DeclList, FunctionDef, NodeId},
        expressions::Expr,
        statements::{Location, StatementList, Stmt},
    },
    errors::errors::Error,
};

use super::symbol_table::{Symbol, SymbolId, SymbolTable};

/// Output of name binding: every declaring or referencing node mapped to a symbol.
#[derive(Debug)]
pub struct Resolutions {
    pub symbols: Arena<Symbol>,
    pub bindings: FxHashMap<NodeId, SymbolId>,
    pub errors: Vec<Error>,
}

impl Resolutions {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.bindings.get(&node).copied()
    }

    pub fn get(&self, symbol: SymbolId) -> &Symbol {
        &self.symbols[symbol]
    }
}

/// Binds every name in `ast` using a fresh [`SymbolTable`].
pub fn resolve(ast: &DeclList) -> Resolutions {
    let mut resolver = Resolver {
        table: SymbolTable::new(),
        bindings: FxHashMap::default(),
    };

    for decl in ast.iter() {
        resolver.resolve_decl(decl);
    }

    let (symbols, errors) = resolver.table.finish();
    Resolutions {
        symbols,
        bindings: resolver.bindings,
        errors,
    }
}

struct Resolver {
    table: SymbolTable,
    bindings: FxHashMap<NodeId, SymbolId>,
}

impl Resolver {
    fn bind(&mut self, node: NodeId, symbol: SymbolId) {
        self.bindings.insert(node, symbol);
    }

    fn resolve_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => {
                let symbol = self.table.add(var.position, &var.name, var.ty.clone());
                self.bind(var.id, symbol);
            }
            Decl::Array(array) => {
                let symbol = self.table.add(array.position, &array.name, array.ty.clone());
                self.bind(array.id, symbol);
            }
            Decl::Function(function) => self.resolve_function(function),
        }
    }

    fn resolve_function(&mut self, function: &FunctionDef) {
        // Declared before the body so that recursive calls resolve
        let symbol = self
            .table
            .add(function.position, &function.name, function.signature());
        self.bind(function.id, symbol);

        self.table.enter();
        for param in function.parameters.iter() {
            let symbol = self.table.add(param.position, &param.name, param.ty.clone());
            self.bind(param.id, symbol);
        }
        self.resolve_statements(&function.body);
        self.table.exit();
    }

    fn resolve_block(&mut self, block: &StatementList) {
        self.table.enter();
        self.resolve_statements(block);
        self.table.exit();
    }

    fn resolve_statements(&mut self, block: &StatementList) {
        for stmt in block.iter() {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(var) => {
                let symbol = self.table.add(var.position, &var.name, var.ty.clone());
                self.bind(var.id, symbol);
            }
            Stmt::Assignment(assignment) => {
                match &assignment.location {
                    Location::Var(access) => {
                        let symbol = self.table.lookup(access.position, &access.name);
                        self.bind(access.id, symbol);
                    }
                    Location::Array(access) => {
                        let symbol = self.table.lookup(access.position, &access.name);
                        self.bind(access.id, symbol);
                        self.resolve_expr(&access.index);
                    }
                }
                self.resolve_expr(&assignment.value);
            }
            Stmt::Call(call) => {
                let symbol = self.table.lookup(call.position, &call.callee);
                self.bind(call.id, symbol);
                for argument in call.arguments.iter() {
                    self.resolve_expr(argument);
                }
            }
            Stmt::IfElse(branch) => {
                self.resolve_expr(&branch.condition);
                self.resolve_block(&branch.then_block);
                if let Some(else_block) = &branch.else_block {
                    self.resolve_block(else_block);
                }
            }
            Stmt::While(loop_) => {
                self.resolve_expr(&loop_.condition);
                self.resolve_block(&loop_.body);
            }
            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::LiteralInt(_) | Expr::LiteralBool(_) => {}
            Expr::VarAccess(access) => {
                let symbol = self.table.lookup(access.position, &access.name);
                self.bind(access.id, symbol);
            }
            Expr::ArrayAccess(access) => {
                let symbol = self.table.lookup(access.position, &access.name);
                self.bind(access.id, symbol);
                self.resolve_expr(&access.index);
            }
            Expr::Call(call) => {
                let symbol = self.table.lookup(call.position, &call.callee);
                self.bind(call.id, symbol);
                for argument in call.arguments.iter() {
                    self.resolve_expr(argument);
                }
            }
            Expr::Op(op) => {
                self.resolve_expr(&op.left);
                if let Some(right) = &op.right {
                    self.resolve_expr(right);
                }
            }
        }
    }
}
