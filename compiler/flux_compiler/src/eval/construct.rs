//! Record and dictionary construction.

use flux_semantic::{MonoType, Name};
use flux_values::{EvalError, EvalResult, Value};

use super::Evaluator;

/// `{base with k: v, ...}` or `{k: v, ...}`.
///
/// The base's fields come first, in their order, and the new properties are
/// appended after them. A label present in both therefore appears twice,
/// and lookup finds the new value.
pub(super) fn object(
    base: Option<Value>,
    properties: &[(Name, Evaluator)],
    mut eval: impl FnMut(&Evaluator) -> EvalResult,
) -> EvalResult {
    let mut fields: Vec<(Name, Value)> = match base {
        None => Vec::with_capacity(properties.len()),
        Some(Value::Record(record)) => {
            let mut fields = Vec::with_capacity(record.len() + properties.len());
            fields.extend(record.fields().iter().cloned());
            fields
        }
        Some(Value::Null(_)) => return Err(EvalError::NullExtend),
        Some(other) => {
            return Err(EvalError::InvalidOperand {
                operator: "with".to_string(),
                operand: other.type_name().to_string(),
            })
        }
    };

    for (key, value) in properties {
        fields.push((key.clone(), eval(value)?));
    }
    Ok(Value::record(fields))
}

/// `[k: v, ...]`, evaluated key then value, pair by pair.
pub(super) fn dict(
    key: &MonoType,
    value: &MonoType,
    elements: &[(Evaluator, Evaluator)],
    mut eval: impl FnMut(&Evaluator) -> EvalResult,
) -> EvalResult {
    let mut entries = Vec::with_capacity(elements.len());
    for (k, v) in elements {
        let k = eval(k)?;
        let v = eval(v)?;
        entries.push((k, v));
    }
    Ok(Value::dict(key.clone(), value.clone(), entries))
}
