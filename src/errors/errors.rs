use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A single diagnostic, tied to the source position it was detected at.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The diagnostic category, as printed in front of the position.
    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::SymbolAlreadyDeclared { .. } => "DeclareSymbolError",
            ErrorImpl::SymbolNotFound { .. } => "ResolveSymbolError",
            ErrorImpl::TypeMismatch { .. } => "TypeError",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}[{}]",
            self.get_error_name(),
            self.position,
            self.internal_error
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("{name} already exists.")]
    SymbolAlreadyDeclared { name: String },
    #[error("Could not find {name}.")]
    SymbolNotFound { name: String },
    #[error("{message}")]
    TypeMismatch { message: String },
}

/// Stage-level failures of the pipeline.
///
/// `Rejected` is the normal outcome for an ill-formed program. Every other
/// variant means an earlier stage handed over something it promised not to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("compilation stopped after {} diagnostic(s)", .0.len())]
    Rejected(Vec<Error>),
    #[error("no symbol is bound to `{name}` at {position}")]
    UnboundSymbol { name: String, position: Position },
    #[error("node at {position} has no type annotation")]
    MissingType { position: Position },
    #[error("operation at {position} has the wrong operands")]
    MalformedOperation { position: Position },
    #[error("`{0}` is used outside of a loop")]
    OutsideLoop(&'static str),
    #[error("{kind} in function `{function}` is missing successor {edge}")]
    MissingSuccessor {
        function: String,
        kind: &'static str,
        edge: usize,
    },
}

impl PipelineError {
    /// The diagnostics of a rejected program, empty for any other failure.
    pub fn diagnostics(&self) -> &[Error] {
        match self {
            PipelineError::Rejected(errors) => errors,
            _ => &[],
        }
    }
}
