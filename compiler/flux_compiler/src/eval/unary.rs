//! Unary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch; the operator and value sets are closed.

use flux_semantic::{MonoType, UnaryOperator};
use flux_values::errors::{invalid_unary_operand, negation_overflow};
use flux_values::{EvalResult, Value};

/// Evaluate `op value`. `typ` is the node's static result type, carried by
/// a null result.
///
/// `exists` is the only operator that looks at a null; the rest pass it
/// through.
pub(crate) fn evaluate_unary(op: UnaryOperator, value: Value, typ: &MonoType) -> EvalResult {
    match (op, &value) {
        (UnaryOperator::Exists, v) => Ok(Value::Bool(!v.is_null())),
        (_, Value::Null(_)) => Ok(Value::Null(typ.clone())),

        // Logical not
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

        // Numeric negation
        (UnaryOperator::Neg, Value::Int(n)) => {
            n.checked_neg().map(Value::Int).ok_or_else(negation_overflow)
        }
        (UnaryOperator::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOperator::Neg, Value::Duration(d)) => Ok(Value::Duration(d.negate())),

        // Numeric identity
        (
            UnaryOperator::Pos,
            Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Duration(_),
        ) => Ok(value),

        _ => Err(invalid_unary_operand(op, &value)),
    }
}
