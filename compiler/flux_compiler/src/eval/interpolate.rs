//! String interpolation: `"n = ${r.n}"`.

use std::fmt::Write;

use flux_values::errors::not_renderable;
use flux_values::{format_time, EvalError, EvalResult, Value};

use super::{Evaluator, StringPart};

/// Concatenate the parts left to right, rendering each interpolated value.
pub(super) fn interpolate(
    parts: &[StringPart],
    mut eval: impl FnMut(&Evaluator) -> EvalResult,
) -> EvalResult {
    let mut out = String::new();
    for part in parts {
        match part {
            StringPart::Text(text) => out.push_str(text),
            StringPart::Interpolated(expr) => render_into(&mut out, &eval(expr)?)?,
        }
    }
    Ok(Value::string(out))
}

/// Append the text form of a scalar. Null and composite values have none.
fn render_into(out: &mut String, value: &Value) -> Result<(), EvalError> {
    // Writing to a String cannot fail.
    let _ = match value {
        Value::String(s) => {
            out.push_str(s);
            Ok(())
        }
        Value::Int(n) => write!(out, "{n}"),
        Value::UInt(n) => write!(out, "{n}"),
        Value::Float(f) => write!(out, "{f}"),
        Value::Bool(b) => write!(out, "{b}"),
        Value::Duration(d) => write!(out, "{d}"),
        Value::Time(t) => {
            out.push_str(&format_time(t));
            Ok(())
        }
        Value::Null(_) => return Err(EvalError::InterpolateNull),
        other => return Err(not_renderable(other)),
    };
    Ok(())
}
