/// AST (Abstract Syntax Tree) module
/// Contains the positioned, untyped tree handed over by the parser
///
/// Submodules:
/// - ast: Node identity, declarations and the tree root
/// - builder: Id-allocating node constructors
/// - expressions: Expression nodes and operator tags
/// - statements: Statement nodes and blocks
/// - types: The type system and its operator algebra
pub mod ast;
pub mod builder;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
