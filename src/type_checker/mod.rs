//! Type checking and semantic analysis module.
//!
//! This module annotates every node of a resolved tree with a typing:
//!
//! - Verifying operator, call, index and assignment types through the type
//!   algebra in `ast::types`
//! - Checking that conditions are `bool` and that `break`/`continue` only
//!   appear inside loops
//! - Checking that non-void functions return on every path and that nothing
//!   follows a `return`
//! - Checking the signature of `main`
//!
//! Type errors are accumulated. A failed operand poisons the expression that
//! uses it so that each mistake is reported once.

pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
