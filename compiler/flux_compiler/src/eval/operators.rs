//! Binary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for binary operations. The type set
//! is fixed, so pattern matching is preferred over trait objects for speed
//! and exhaustiveness checking.
//!
//! A null operand makes every binary operator yield null of the node's
//! static type, including `==`: two unknowns are not known to be equal.

use std::cmp::Ordering;

use flux_semantic::{BinaryOperator, MonoType};
use flux_values::errors::{integer_overflow, invalid_binary_operands};
use flux_values::{EvalError, EvalResult, Value};

// Helper functions for repetitive checked arithmetic patterns

/// Checked arithmetic where the only failure is overflow.
#[inline]
fn checked_arith<T>(result: Option<T>, wrap: fn(T) -> Value, op: BinaryOperator) -> EvalResult {
    result.map(wrap).ok_or_else(|| integer_overflow(op))
}

/// Checked division or remainder with a zero guard.
#[inline]
fn checked_div<T, F>(
    is_zero: bool,
    op: F,
    wrap: fn(T) -> Value,
    operator: BinaryOperator,
) -> EvalResult
where
    F: FnOnce() -> Option<T>,
{
    if is_zero {
        Err(EvalError::DivisionByZero)
    } else {
        op().map(wrap).ok_or_else(|| integer_overflow(operator))
    }
}

// Direct Dispatch Function

/// Evaluate `left op right`. `typ` is the node's static result type.
pub(crate) fn evaluate_binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    typ: &MonoType,
) -> EvalResult {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null(typ.clone()));
    }

    match op {
        BinaryOperator::Eq => equals(left, right).map(Value::Bool),
        BinaryOperator::NotEq => equals(left, right).map(|eq| Value::Bool(!eq)),
        BinaryOperator::Lt => ordered(op, left, right, Ordering::is_lt),
        BinaryOperator::LtEq => ordered(op, left, right, Ordering::is_le),
        BinaryOperator::Gt => ordered(op, left, right, Ordering::is_gt),
        BinaryOperator::GtEq => ordered(op, left, right, Ordering::is_ge),
        BinaryOperator::RegexMatch => regex_match(op, left, right).map(Value::Bool),
        BinaryOperator::RegexNotMatch => regex_match(op, left, right).map(|m| Value::Bool(!m)),
        BinaryOperator::Add
        | BinaryOperator::Sub
        | BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Mod
        | BinaryOperator::Pow => arithmetic(op, left, right),
    }
}

// Arithmetic

fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_arith(*a, *b, op),
        (Value::UInt(a), Value::UInt(b)) => eval_uint_arith(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(eval_float_arith(*a, *b, op))),
        (Value::String(a), Value::String(b)) if op == BinaryOperator::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::string(s))
        }
        _ => Err(invalid_binary_operands(op, left, right)),
    }
}

fn eval_int_arith(a: i64, b: i64, op: BinaryOperator) -> EvalResult {
    match op {
        BinaryOperator::Add => checked_arith(a.checked_add(b), Value::Int, op),
        BinaryOperator::Sub => checked_arith(a.checked_sub(b), Value::Int, op),
        BinaryOperator::Mul => checked_arith(a.checked_mul(b), Value::Int, op),
        BinaryOperator::Div => checked_div(b == 0, || a.checked_div(b), Value::Int, op),
        BinaryOperator::Mod => checked_div(b == 0, || a.checked_rem(b), Value::Int, op),
        BinaryOperator::Pow => {
            if b < 0 {
                return Err(EvalError::NegativeExponent { exponent: b });
            }
            let exp = u32::try_from(b).map_err(|_| integer_overflow(op))?;
            checked_arith(a.checked_pow(exp), Value::Int, op)
        }
        _ => unreachable_arith(op, "int"),
    }
}

fn eval_uint_arith(a: u64, b: u64, op: BinaryOperator) -> EvalResult {
    match op {
        BinaryOperator::Add => checked_arith(a.checked_add(b), Value::UInt, op),
        BinaryOperator::Sub => checked_arith(a.checked_sub(b), Value::UInt, op),
        BinaryOperator::Mul => checked_arith(a.checked_mul(b), Value::UInt, op),
        BinaryOperator::Div => checked_div(b == 0, || a.checked_div(b), Value::UInt, op),
        BinaryOperator::Mod => checked_div(b == 0, || a.checked_rem(b), Value::UInt, op),
        BinaryOperator::Pow => {
            let exp = u32::try_from(b).map_err(|_| integer_overflow(op))?;
            checked_arith(a.checked_pow(exp), Value::UInt, op)
        }
        _ => unreachable_arith(op, "uint"),
    }
}

fn eval_float_arith(a: f64, b: f64, op: BinaryOperator) -> f64 {
    match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Mod => a % b,
        BinaryOperator::Pow => a.powf(b),
        // Predicates never reach here.
        _ => f64::NAN,
    }
}

#[cold]
fn unreachable_arith(op: BinaryOperator, kind: &str) -> EvalResult {
    Err(EvalError::InvalidOperands {
        operator: op.as_symbol().to_string(),
        left: kind.to_string(),
        right: kind.to_string(),
    })
}

// Equality and ordering

/// Numbers compare by value across `int`, `uint` and `float`. Other kinds
/// must match.
fn equals(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some(ordering) = numeric_cmp(left, right) {
        return Ok(ordering == Some(Ordering::Equal));
    }
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Bytes(a), Value::Bytes(b)) => Ok(a == b),
        (Value::Time(a), Value::Time(b)) => Ok(a == b),
        (Value::Duration(a), Value::Duration(b)) => Ok(a == b),
        (Value::Regexp(a), Value::Regexp(b)) => Ok(a == b),
        (Value::Array(_), Value::Array(_))
        | (Value::Record(_), Value::Record(_))
        | (Value::Dict(_), Value::Dict(_))
        | (Value::Function(_), Value::Function(_)) => Ok(left == right),
        _ => Err(invalid_binary_operands(BinaryOperator::Eq, left, right)),
    }
}

/// Apply an ordering predicate. Unordered operands (NaN, or durations such
/// as `1mo` and `30d`) satisfy none of them.
fn ordered(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    predicate: fn(Ordering) -> bool,
) -> EvalResult {
    let ordering = match numeric_cmp(left, right) {
        Some(ordering) => ordering,
        None => match (left, right) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => a.partial_cmp(b),
            _ => return Err(invalid_binary_operands(op, left, right)),
        },
    };
    Ok(Value::Bool(ordering.is_some_and(predicate)))
}

/// `Some(ordering)` when both operands are numbers; the inner `None` is an
/// unordered float comparison.
#[expect(
    clippy::cast_precision_loss,
    reason = "Mixed int/float comparison follows float semantics"
)]
fn numeric_cmp(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::UInt(a), Value::UInt(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::UInt(b)) => Some(cmp_int_uint(*a, *b)),
        (Value::UInt(a), Value::Int(b)) => Some(cmp_int_uint(*b, *a).reverse()),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::UInt(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::UInt(b)) => a.partial_cmp(&(*b as f64)),
        _ => return None,
    };
    Some(ordering)
}

fn cmp_int_uint(a: i64, b: u64) -> Ordering {
    match u64::try_from(a) {
        Ok(a) => a.cmp(&b),
        Err(_) => Ordering::Less,
    }
}

// Regular expressions

fn regex_match(op: BinaryOperator, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::String(s), Value::Regexp(re)) => Ok(re.is_match(s)),
        _ => Err(invalid_binary_operands(op, left, right)),
    }
}
