//! Scoped symbol resolution.
//!
//! This module binds every name in the tree to the declaration it refers to:
//!
//! - `symbol_table`: a stack of scopes whose bottom scope holds the
//!   intrinsic functions, reporting duplicate declarations and unresolved
//!   names without aborting
//! - `resolver`: the tree walk that enters and exits scopes the way the
//!   language nests them and records node→symbol bindings
//!
//! Failed declarations and lookups still produce a (poisoned) symbol so the
//! walk can continue and collect every diagnostic in one pass.

pub mod resolver;
pub mod symbol_table;
