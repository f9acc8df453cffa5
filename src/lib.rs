#![allow(clippy::module_inception)]

use std::{fmt::Display, time::Instant};

use log::debug;

use crate::{
    ast::ast::DeclList,
    codegen::codegen::{generate, CodegenOptions},
    errors::errors::PipelineError,
    lowering::lower::lower,
    symbols::resolver::resolve,
    type_checker::type_checker::TypeChecker,
};

pub mod ast;
pub mod codegen;
pub mod errors;
pub mod ir;
pub mod lowering;
pub mod symbols;
pub mod type_checker;

/// A location in the source text, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Position used for intrinsic symbols, which have no source location.
    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// Runs every stage on a parsed program and returns the assembly listing.
///
/// Symbol resolution and type checking both accumulate diagnostics. Checking
/// always runs so that resolution and type errors are reported together; if
/// there is any diagnostic the pipeline stops before lowering and hands the
/// whole list back in [`PipelineError::Rejected`].
pub fn compile(ast: &DeclList) -> Result<String, PipelineError> {
    compile_with_options(ast, &CodegenOptions::default())
}

pub fn compile_with_options(
    ast: &DeclList,
    options: &CodegenOptions,
) -> Result<String, PipelineError> {
    let start = Instant::now();

    let resolutions = resolve(ast);
    debug!(
        "Resolved symbols in {:?} ({} errors)",
        start.elapsed(),
        resolutions.errors.len()
    );

    let check_start = Instant::now();
    let typed_program = TypeChecker::new().check(ast, resolutions)?;
    debug!("Type checked in {:?}", check_start.elapsed());

    let lower_start = Instant::now();
    let program = lower(typed_program)?;
    debug!("Lowered in {:?}", lower_start.elapsed());

    let codegen_start = Instant::now();
    let assembly = generate(&program, options)?;
    debug!("Generated assembly in {:?}", codegen_start.elapsed());
    debug!("Total time: {:?}", start.elapsed());

    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 14).to_string(), "(3:14)");
        assert_eq!(Position::null().to_string(), "(0:0)");
    }
}
