use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;

use crate::{
    ast::types::{Type, INTRINSICS},
    errors::errors::{Error, ErrorImpl},
    Position,
};

pub type SymbolId = Idx<Symbol>;

/// Why a symbol carries no type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poison {
    DeclareSymbolError,
    ResolveSymbolError,
}

/// A name and what it resolved to. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Result<Type, Poison>,
}

impl Symbol {
    pub fn is_poisoned(&self) -> bool {
        self.ty.is_err()
    }
}

/// Stack of scopes mapping names to symbols.
///
/// The bottom scope is created with the intrinsic functions already in it.
/// All symbols, poisoned ones included, live in one arena owned by the table
/// so tree nodes can refer to them by id.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: Arena<Symbol>,
    scopes: Vec<FxHashMap<String, SymbolId>>,
    errors: Vec<Error>,
    encountered_error: bool,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable {
            symbols: Arena::new(),
            scopes: vec![FxHashMap::default()],
            errors: vec![],
            encountered_error: false,
        };

        for (name, ty) in INTRINSICS.iter() {
            table.add(Position::null(), name, ty.clone());
        }

        table
    }

    pub fn has_encountered_error(&self) -> bool {
        self.encountered_error
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pops the innermost scope. Popping the intrinsic scope is a bug in the caller.
    pub fn exit(&mut self) {
        assert!(self.scopes.len() > 1, "Attempted to exit the global scope");
        self.scopes.pop();
    }

    /// Declares `name` in the innermost scope.
    ///
    /// A name already present in that scope is reported and the returned
    /// symbol is poisoned; the earlier declaration stays in place.
    pub fn add(&mut self, position: Position, name: &str, ty: Type) -> SymbolId {
        let scope_index = self.scopes.len() - 1;
        if self.scopes[scope_index].contains_key(name) {
            self.report(ErrorImpl::SymbolAlreadyDeclared { name: name.to_string() }, position);
            return self.symbols.alloc(Symbol {
                name: name.to_string(),
                ty: Err(Poison::DeclareSymbolError),
            });
        }

        let symbol = self.symbols.alloc(Symbol {
            name: name.to_string(),
            ty: Ok(ty),
        });
        self.scopes[scope_index].insert(name.to_string(), symbol);
        symbol
    }

    /// Resolves `name` from the innermost scope outwards.
    pub fn lookup(&mut self, position: Position, name: &str) -> SymbolId {
        match self.find(name) {
            Some(symbol) => symbol,
            None => {
                self.report(ErrorImpl::SymbolNotFound { name: name.to_string() }, position);
                self.symbols.alloc(Symbol {
                    name: name.to_string(),
                    ty: Err(Poison::ResolveSymbolError),
                })
            }
        }
    }

    pub fn get(&self, symbol: SymbolId) -> &Symbol {
        &self.symbols[symbol]
    }

    fn find(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn report(&mut self, error: ErrorImpl, position: Position) {
        self.errors.push(Error::new(error, position));
        self.encountered_error = true;
    }

    /// Hands over the symbol arena and the accumulated diagnostics.
    pub fn finish(self) -> (Arena<Symbol>, Vec<Error>) {
        (self.symbols, self.errors)
    }
}
