//! Diagnostics and pipeline errors.
//!
//! This module defines the error types used throughout the compiler:
//!
//! - Diagnostics (`Error`) carrying a source position, in the three
//!   categories the front stages report: declaration, resolution and type
//! - Pipeline errors raised when a stage is handed input that an earlier
//!   stage should have rejected
//! - Rendering of a diagnostic against the source it refers to

pub mod errors;
