//! Compile errors.
//!
//! Compilation either yields a complete evaluator tree or one of these. A
//! compile error is permanent for the given graph and input type.

use flux_semantic::{MonoType, Name, UnifyError};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("function input must be a record type, got {typ}")]
    InputNotRecord { typ: MonoType },

    #[error("input property {parameter:?} does not match its parameter: {source}")]
    InputMismatch {
        parameter: Name,
        #[source]
        source: UnifyError,
    },

    #[error("cannot resolve type {typ} of {node}")]
    UnresolvedType { typ: MonoType, node: &'static str },

    #[error("invalid {node}: {reason}")]
    InvalidExpression { node: &'static str, reason: String },

    #[error("invalid block: {reason}")]
    InvalidBlock { reason: &'static str },

    #[error("invalid regular expression /{pattern}/: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("undefined identifier {name:?}")]
    UndefinedIdentifier { name: Name },

    #[error("duplicate parameter {name:?}")]
    DuplicateParameter { name: Name },
}

pub(crate) fn invalid_expression(node: &'static str, reason: impl Into<String>) -> CompileError {
    CompileError::InvalidExpression {
        node,
        reason: reason.into(),
    }
}
