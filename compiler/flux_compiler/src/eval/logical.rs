//! Short-circuiting `and` / `or` with three-valued logic.
//!
//! Null is "unknown": `null and false` is `false` and `null or true` is
//! `true`, because the unknown side cannot change the outcome. Every other
//! combination involving null is null.

use flux_semantic::{LogicalOperator, MonoType};
use flux_values::{EvalError, EvalResult, Value};

/// Evaluate `left op right`, calling `right` only when `left` does not
/// decide the result.
pub(crate) fn evaluate_logical(
    operator: LogicalOperator,
    left: Value,
    right: impl FnOnce() -> EvalResult,
) -> EvalResult {
    let left = truth(operator, &left)?;
    let decisive = matches!(operator, LogicalOperator::Or);
    if left == Some(decisive) {
        return Ok(Value::Bool(decisive));
    }

    let right = right()?;
    let right = truth(operator, &right)?;
    Ok(match (left, right) {
        (_, Some(r)) if r == decisive => Value::Bool(decisive),
        (Some(_), Some(r)) => Value::Bool(r),
        _ => Value::Null(MonoType::BOOL),
    })
}

/// `Some(bool)` for a boolean, `None` for null.
fn truth(operator: LogicalOperator, value: &Value) -> Result<Option<bool>, EvalError> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null(_) => Ok(None),
        other => Err(EvalError::InvalidOperand {
            operator: operator.as_symbol().to_string(),
            operand: other.type_name().to_string(),
        }),
    }
}
