//! Intermediate representation.
//!
//! Each function owns an arena of instructions. An instruction names its
//! successors by arena index, so loop back-edges and shared join points need
//! no shared ownership. Traversals over the graph must track what they have
//! visited because loops make it cyclic.

pub mod ir;

#[cfg(test)]
mod tests;
