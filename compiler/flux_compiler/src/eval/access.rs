//! Member and index access.
//!
//! The base being null is an error: there is nothing to look into. The
//! looked-up thing being absent is not; it yields a null of the node's
//! static type. A null that is found takes the static type too, since it
//! may have been stored by a polymorphic closure.

use flux_semantic::{MonoType, Name};
use flux_values::errors::{index_out_of_bounds, null_access};
use flux_values::{Array, EvalError, EvalResult, Value};

/// `object.property`
pub(super) fn member(object: &Value, property: &Name, typ: &MonoType) -> EvalResult {
    match object {
        Value::Record(record) => Ok(found(record.get(property), typ)),
        Value::Null(_) => Err(null_access(format!("property {property:?}"))),
        other => Err(EvalError::InvalidOperand {
            operator: ".".to_string(),
            operand: other.type_name().to_string(),
        }),
    }
}

/// `base[index]`. The index is only evaluated once the base is known to be
/// indexable.
pub(super) fn index(
    base: &Value,
    index: impl FnOnce() -> EvalResult,
    typ: &MonoType,
) -> EvalResult {
    match base {
        Value::Array(array) => match index()? {
            Value::Null(_) => Ok(Value::Null(typ.clone())),
            Value::Int(i) => element(array, i, typ),
            Value::UInt(u) => element(array, i64::try_from(u).unwrap_or(i64::MAX), typ),
            other => Err(invalid_index(base, &other)),
        },
        Value::Dict(dict) => {
            let key = index()?;
            if key.is_null() {
                return Ok(Value::Null(typ.clone()));
            }
            Ok(found(dict.get(&key), typ))
        }
        Value::Null(_) => Err(null_access("index")),
        other => Err(EvalError::InvalidOperand {
            operator: "[]".to_string(),
            operand: other.type_name().to_string(),
        }),
    }
}

fn element(array: &Array, i: i64, typ: &MonoType) -> EvalResult {
    match array.get(i) {
        Some(value) => Ok(found(Some(value), typ)),
        None => Err(index_out_of_bounds(i, array.len())),
    }
}

/// A looked-up value, or a null of the static type when it is absent or null.
fn found(value: Option<&Value>, typ: &MonoType) -> Value {
    match value {
        Some(Value::Null(_)) | None => Value::Null(typ.clone()),
        Some(value) => value.clone(),
    }
}

fn invalid_index(base: &Value, index: &Value) -> EvalError {
    EvalError::InvalidOperands {
        operator: "[]".to_string(),
        left: base.type_name().to_string(),
        right: index.type_name().to_string(),
    }
}
