//! Assembly generation from the IR.
//!
//! - `codegen`: stack slot assignment, labels and linearization of each
//!   function's instruction graph
//! - `emit`: the fixed x86-64 sequence for each instruction kind, including
//!   the calling convention for calls and returns
//!
//! The generator runs only on programs that passed checking. A malformed
//! graph is reported as a [`PipelineError`](crate::errors::errors::PipelineError)
//! rather than emitted.

pub mod codegen;
pub mod emit;
