//! Lowering driver.
//!
//! This module turns a [`TypedProgram`] into an IR [`Program`]. Globals become
//! [`GlobalDecl`]s and every function definition is lowered into its own
//! instruction arena by the statement and expression lowering functions.

use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    ast::{
        ast::{Decl, FunctionDef, NodeId},
        types::Type,
    },
    errors::errors::PipelineError,
    ir::ir::{Function, GlobalDecl, InstId, LocalVar, Program},
    symbols::symbol_table::SymbolId,
    type_checker::typed_ast::TypedProgram,
    Position,
};

use super::stmt::lower_statements;

/// A lowered statement: where it starts and where control leaves it.
///
/// `end` is `None` for statements that never fall through, such as `return`,
/// `break` and `continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstPair {
    pub start: InstId,
    pub end: Option<InstId>,
}

impl InstPair {
    pub fn single(inst: InstId) -> Self {
        InstPair {
            start: inst,
            end: Some(inst),
        }
    }
}

/// A lowered expression, whose chain always falls through and leaves its
/// result in `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprPair {
    pub start: InstId,
    pub end: InstId,
    pub value: LocalVar,
}

impl From<ExprPair> for InstPair {
    fn from(pair: ExprPair) -> Self {
        InstPair {
            start: pair.start,
            end: Some(pair.end),
        }
    }
}

/// Where `break` and `continue` jump to inside the innermost loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    /// The no-op after the loop.
    pub join: InstId,
    /// The no-op that re-evaluates the condition.
    pub recompute: InstId,
}

/// State for lowering one function.
pub struct Lowerer<'p, 'a> {
    /// The checked program, read for bindings and node types
    pub typed: &'p TypedProgram<'a>,
    /// The function being built
    pub function: Function,
    /// Temporaries bound to parameters and local variables
    pub locals: FxHashMap<SymbolId, LocalVar>,
}

impl<'p, 'a> Lowerer<'p, 'a> {
    pub fn new(typed: &'p TypedProgram<'a>, function: Function) -> Self {
        Lowerer {
            typed,
            function,
            locals: FxHashMap::default(),
        }
    }

    pub fn symbol_of(
        &self,
        node: NodeId,
        name: &str,
        position: Position,
    ) -> Result<SymbolId, PipelineError> {
        self.typed
            .symbol_of(node)
            .ok_or_else(|| PipelineError::UnboundSymbol {
                name: name.to_string(),
                position,
            })
    }

    pub fn type_of(&self, node: NodeId, position: Position) -> Result<Type, PipelineError> {
        self.typed
            .type_of(node)
            .cloned()
            .ok_or(PipelineError::MissingType { position })
    }

    /// Binds a fresh temporary to a parameter or local declaration.
    pub fn declare_local(&mut self, symbol: SymbolId, ty: Type) -> LocalVar {
        let var = self.function.new_local(ty);
        self.locals.insert(symbol, var);
        var
    }

    pub fn local(&self, symbol: SymbolId) -> Option<LocalVar> {
        self.locals.get(&symbol).copied()
    }
}

/// Lowers a checked program.
///
/// Only a program that passed checking can be lowered, so any missing
/// binding or type found here is a contract violation.
pub fn lower(typed: TypedProgram<'_>) -> Result<Program, PipelineError> {
    let mut globals = vec![];
    let mut functions = vec![];

    for decl in typed.ast.iter() {
        match decl {
            Decl::Var(var) => {
                let symbol = typed.symbol_of(var.id).ok_or_else(|| PipelineError::UnboundSymbol {
                    name: var.name.clone(),
                    position: var.position,
                })?;
                globals.push(GlobalDecl { symbol, count: 1 });
            }
            Decl::Array(array) => {
                let symbol =
                    typed
                        .symbol_of(array.id)
                        .ok_or_else(|| PipelineError::UnboundSymbol {
                            name: array.name.clone(),
                            position: array.position,
                        })?;
                let Type::Array { extent, .. } = array.ty else {
                    return Err(PipelineError::MissingType {
                        position: array.position,
                    });
                };
                globals.push(GlobalDecl {
                    symbol,
                    count: extent,
                });
            }
            Decl::Function(definition) => functions.push(lower_function(&typed, definition)?),
        }
    }

    let TypedProgram { symbols, .. } = typed;
    Ok(Program {
        globals,
        functions,
        symbols,
    })
}

fn lower_function(
    typed: &TypedProgram<'_>,
    definition: &FunctionDef,
) -> Result<Function, PipelineError> {
    let function = Function::new(&definition.name, definition.signature());
    let mut lowerer = Lowerer::new(typed, function);

    for param in definition.parameters.iter() {
        let symbol = lowerer.symbol_of(param.id, &param.name, param.position)?;
        let var = lowerer.declare_local(symbol, param.ty.clone());
        lowerer.function.arguments.push(var);
    }

    let body = lower_statements(&mut lowerer, &definition.body, None)?;
    let entry = lowerer.function.entry;
    lowerer.function.link(entry, body.start);

    debug!(
        "Lowered {} into {} instructions and {} temporaries",
        definition.name,
        lowerer.function.instructions.len(),
        lowerer.function.locals.len() + lowerer.function.addresses.len()
    );

    Ok(lowerer.function)
}
