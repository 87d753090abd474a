//! Evaluation errors.
//!
//! An `EvalError` ends one invocation and leaves the compiled function
//! untouched. Errors fall into three classes (see [`ErrorClass`]): faults in
//! the data being evaluated, control signals from the execution context,
//! and internal defects that a well-typed graph can never produce.

use std::time::Duration as StdDuration;

use flux_semantic::{BinaryOperator, Name, UnaryOperator};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Who is responsible for an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The input data or the query. Report to the user.
    User,
    /// Cancellation, deadline or depth limit imposed by the caller.
    Control,
    /// Invariant violation inside the compiler or evaluator.
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    // User
    #[error("index out of bounds: {index} (array length {len})")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("cannot access {what} of a null value")]
    NullAccess { what: String },
    #[error("cannot extend a null record")]
    NullExtend,
    #[error("cannot call a null function")]
    NullCall,
    #[error("string interpolation of a null value")]
    InterpolateNull,
    #[error("cannot interpolate a value of type {type_name}")]
    NotRenderable { type_name: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },
    #[error("negative exponent {exponent} for integer power")]
    NegativeExponent { exponent: i64 },
    #[error("invalid operands for {operator}: {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid operand for {operator}: {operand}")]
    InvalidOperand { operator: String, operand: String },

    // Control
    #[error("evaluation cancelled")]
    Cancelled,
    #[error("evaluation deadline of {timeout:?} exceeded")]
    DeadlineExceeded { timeout: StdDuration },
    #[error("maximum call depth of {limit} exceeded")]
    RecursionLimit { limit: usize },

    // Internal
    #[error("unresolved identifier {name:?}")]
    UnresolvedIdentifier { name: Name },
    #[error("missing argument {name:?}")]
    MissingArgument { name: Name },
    #[error("function has no parameter {name:?}")]
    UnknownArgument { name: Name },
    #[error("function has no pipe parameter")]
    UnexpectedPipe,
    #[error("value of type {type_name} is not callable")]
    NotCallable { type_name: String },
}

impl EvalError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EvalError::IndexOutOfBounds { .. }
            | EvalError::NullAccess { .. }
            | EvalError::NullExtend
            | EvalError::NullCall
            | EvalError::InterpolateNull
            | EvalError::NotRenderable { .. }
            | EvalError::DivisionByZero
            | EvalError::IntegerOverflow { .. }
            | EvalError::NegativeExponent { .. }
            | EvalError::InvalidOperands { .. }
            | EvalError::InvalidOperand { .. } => ErrorClass::User,
            EvalError::Cancelled
            | EvalError::DeadlineExceeded { .. }
            | EvalError::RecursionLimit { .. } => ErrorClass::Control,
            EvalError::UnresolvedIdentifier { .. }
            | EvalError::MissingArgument { .. }
            | EvalError::UnknownArgument { .. }
            | EvalError::UnexpectedPipe
            | EvalError::NotCallable { .. } => ErrorClass::Internal,
        }
    }

    /// Whether this is an evaluator defect rather than a data fault.
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.class() == ErrorClass::Internal
    }
}

// Factory functions

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::IndexOutOfBounds { index, len }
}

#[cold]
pub fn null_access(what: impl Into<String>) -> EvalError {
    EvalError::NullAccess { what: what.into() }
}

#[cold]
pub fn integer_overflow(operator: BinaryOperator) -> EvalError {
    EvalError::IntegerOverflow {
        operation: operator.as_symbol().to_string(),
    }
}

#[cold]
pub fn negation_overflow() -> EvalError {
    EvalError::IntegerOverflow {
        operation: "negation".to_string(),
    }
}

#[cold]
pub fn invalid_binary_operands(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> EvalError {
    EvalError::InvalidOperands {
        operator: operator.as_symbol().to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

#[cold]
pub fn invalid_unary_operand(operator: UnaryOperator, operand: &Value) -> EvalError {
    EvalError::InvalidOperand {
        operator: operator.as_symbol().to_string(),
        operand: operand.type_name().to_string(),
    }
}

#[cold]
pub fn not_renderable(value: &Value) -> EvalError {
    EvalError::NotRenderable {
        type_name: value.type_name().to_string(),
    }
}

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::NotCallable {
        type_name: value.type_name().to_string(),
    }
}
