//! The checked program handed to lowering.
//!
//! Annotations live next to the tree instead of inside it: `TypeTable` maps
//! node ids to their typing, and the binding table from name resolution maps
//! node ids to symbols. A [`TypedProgram`] can only be obtained from a check
//! that reported nothing, so anything consuming one may assume every node it
//! visits is well typed.

use la_arena::Arena;
use rustc_hash::FxHashMap;

use crate::{
    ast::{
        ast::{DeclList, NodeId},
        types::{Type, Typing},
    },
    symbols::symbol_table::{Symbol, SymbolId},
};

#[derive(Debug, Default)]
pub struct TypeTable {
    types: FxHashMap<NodeId, Typing>,
}

impl TypeTable {
    pub fn set(&mut self, node: NodeId, typing: Typing) {
        self.types.insert(node, typing);
    }

    pub fn get(&self, node: NodeId) -> Option<&Typing> {
        self.types.get(&node)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug)]
pub struct TypedProgram<'a> {
    pub ast: &'a DeclList,
    pub symbols: Arena<Symbol>,
    pub bindings: FxHashMap<NodeId, SymbolId>,
    pub types: TypeTable,
}

impl<'a> TypedProgram<'a> {
    /// The type of a node, if it checked successfully.
    pub fn type_of(&self, node: NodeId) -> Option<&Type> {
        self.types.get(node).and_then(|typing| typing.as_ref().ok())
    }

    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.bindings.get(&node).copied()
    }

    pub fn symbol(&self, symbol: SymbolId) -> &Symbol {
        &self.symbols[symbol]
    }
}
