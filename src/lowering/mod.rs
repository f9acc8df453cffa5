//! Lowering from the checked tree to the IR.
//!
//! This module builds one instruction graph per function:
//!
//! - `lower`: the driver, global storage and per-function state
//! - `stmt`: statements, including the branch and loop shapes and the
//!   patching of `break`/`continue` to their loop targets
//! - `expr`: expressions, including explicit short-circuit branches for
//!   `&&` and `||`
//!
//! Every visit returns the first instruction of the chain it built and the
//! instruction control leaves from, plus the temporary holding the result for
//! expressions.

pub mod expr;
pub mod lower;
pub mod stmt;
