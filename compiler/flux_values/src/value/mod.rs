//! Runtime values.
//!
//! Scalars are stored inline. Strings, bytes and composites sit behind
//! `Arc`, so cloning a value never copies its payload and values can be
//! shared freely between the threads evaluating one compiled function.
//!
//! Construct values through the factory methods (`Value::int`,
//! `Value::record`, ...) rather than the variants where a payload type is
//! involved.
//!
//! # Null
//!
//! `Null` carries the type the value would have had if present, so a
//! missing field of type `int` evaluates to `Null(int)`, not to an untyped
//! null.

mod composite;
mod duration;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use flux_semantic::{MonoType, Name};
use indexmap::IndexMap;

use crate::function::Callable;

pub use composite::{Array, Dictionary, Record, Regexp};
pub use duration::Duration;

#[derive(Clone, Debug)]
pub enum Value {
    Null(MonoType),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Time(DateTime<Utc>),
    Duration(Duration),
    Regexp(Regexp),
    Array(Arc<Array>),
    Record(Arc<Record>),
    Dict(Arc<Dictionary>),
    Function(Arc<dyn Callable>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn null(typ: MonoType) -> Self {
        Value::Null(typ)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn uint(n: u64) -> Self {
        Value::UInt(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Value::Bytes(Arc::from(b.as_ref()))
    }

    #[inline]
    pub fn time(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }

    #[inline]
    pub fn duration(d: Duration) -> Self {
        Value::Duration(d)
    }

    pub fn regexp(re: Regexp) -> Self {
        Value::Regexp(re)
    }

    /// Array of `element` values.
    pub fn array(element: MonoType, elements: Vec<Value>) -> Self {
        Value::Array(Arc::new(Array { element, elements }))
    }

    /// Record with fields in the given order. Repeated labels are kept.
    pub fn record<K: Into<Name>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Arc::new(Record {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }))
    }

    /// Dictionary with the given key and value types.
    ///
    /// A repeated key keeps its first position and its last value.
    pub fn dict(
        key: MonoType,
        value: MonoType,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        Value::Dict(Arc::new(Dictionary {
            key,
            value,
            entries: entries.into_iter().collect::<IndexMap<_, _>>(),
        }))
    }

    pub fn function(f: impl Callable + 'static) -> Self {
        Value::Function(Arc::new(f))
    }
}

// Queries

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The value's type. For `Null` this is the carried static type.
    pub fn typ(&self) -> MonoType {
        match self {
            Value::Null(t) => t.clone(),
            Value::Bool(_) => MonoType::BOOL,
            Value::Int(_) => MonoType::INT,
            Value::UInt(_) => MonoType::UINT,
            Value::Float(_) => MonoType::FLOAT,
            Value::String(_) => MonoType::STRING,
            Value::Bytes(_) => MonoType::BYTES,
            Value::Time(_) => MonoType::TIME,
            Value::Duration(_) => MonoType::DURATION,
            Value::Regexp(_) => MonoType::REGEXP,
            Value::Array(a) => MonoType::array(a.element.clone()),
            Value::Record(r) => r.typ(),
            Value::Dict(d) => MonoType::dict(d.key.clone(), d.value.clone()),
            Value::Function(f) => f.function_type().clone(),
        }
    }

    /// Coarse name of the value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null(_) => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Regexp(_) => "regexp",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Dict(_) => "dictionary",
            Value::Function(_) => "function",
        }
    }

    /// Whether the value, or anything nested in it, carries a type that
    /// still mentions type variables.
    pub fn is_generic(&self) -> bool {
        match self {
            Value::Null(t) => !t.is_monomorphic(),
            Value::Array(a) => {
                !a.element.is_monomorphic() || a.elements.iter().any(Value::is_generic)
            }
            Value::Dict(d) => {
                !d.key.is_monomorphic()
                    || !d.value.is_monomorphic()
                    || d.entries.values().any(Value::is_generic)
            }
            Value::Record(r) => r.fields.iter().any(|(_, v)| v.is_generic()),
            _ => false,
        }
    }

    /// Re-label a value whose carried type is less specific than `typ`.
    ///
    /// Nulls take `typ`. Arrays and dictionaries take its element types and
    /// relabel their contents; records relabel their fields by the field
    /// types of `typ`. A value of any other kind, or a `typ` of a different
    /// shape, is returned unchanged.
    #[must_use]
    pub fn retyped(self, typ: &MonoType) -> Self {
        match (self, typ) {
            (Value::Null(_), _) => Value::Null(typ.clone()),
            (Value::Array(a), MonoType::Array(element)) => {
                if a.element == **element && !a.elements.iter().any(Value::is_generic) {
                    return Value::Array(a);
                }
                let elements = match Arc::try_unwrap(a) {
                    Ok(a) => a.elements,
                    Err(a) => a.elements.clone(),
                };
                let elements = elements.into_iter().map(|e| relabel(e, element)).collect();
                Value::array((**element).clone(), elements)
            }
            (Value::Dict(d), MonoType::Dict(dt)) => {
                let generic_values = d.entries.values().any(Value::is_generic);
                if d.key == dt.key && d.value == dt.value && !generic_values {
                    return Value::Dict(d);
                }
                let entries = match Arc::try_unwrap(d) {
                    Ok(d) => d.entries,
                    Err(d) => d.entries.clone(),
                };
                Value::Dict(Arc::new(Dictionary {
                    key: dt.key.clone(),
                    value: dt.value.clone(),
                    entries: entries
                        .into_iter()
                        .map(|(k, v)| (k, relabel(v, &dt.value)))
                        .collect(),
                }))
            }
            (Value::Record(r), MonoType::Record(rt)) => {
                if !r.fields.iter().any(|(_, v)| v.is_generic()) {
                    return Value::Record(r);
                }
                // Align by position when the labels line up, so repeated
                // labels each get their own type; otherwise by label.
                let positional = r.fields.len() == rt.fields.len()
                    && r.fields
                        .iter()
                        .zip(&rt.fields)
                        .all(|((k, _), p)| *k == p.key);
                let fields = r
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, (k, v))| {
                        let field_type = if positional {
                            rt.fields.get(i).map(|p| &p.value)
                        } else {
                            rt.field(k)
                        };
                        let v = match field_type {
                            Some(t) => relabel(v.clone(), t),
                            None => v.clone(),
                        };
                        (k.clone(), v)
                    })
                    .collect();
                Value::Record(Arc::new(Record { fields }))
            }
            (v, _) => v,
        }
    }
}

/// Retype only what still carries a type variable.
fn relabel(value: Value, typ: &MonoType) -> Value {
    if value.is_generic() {
        value.retyped(typ)
    } else {
        value
    }
}

/// RFC 3339 with as many sub-second digits as needed and a `Z` suffix.
pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// Equality and hashing
//
// Structural: floats compare by bit pattern so `Value` can be `Eq` and key
// a dictionary. IEEE comparison belongs to the operators, not here.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null(a), Value::Null(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Regexp(a), Value::Regexp(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            // Functions are equal by identity
            (Value::Function(a), Value::Function(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null(t) => t.hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::UInt(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Duration(d) => d.hash(state),
            Value::Regexp(r) => r.hash(state),
            Value::Array(a) => a.hash(state),
            Value::Record(r) => r.hash(state),
            Value::Dict(d) => d.hash(state),
            Value::Function(f) => Arc::as_ptr(f).cast::<()>().hash(state),
        }
    }
}

// Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null(_) => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => {
                f.write_str("0x")?;
                for byte in b.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Time(t) => f.write_str(&format_time(t)),
            Value::Duration(d) => write!(f, "{d}"),
            Value::Regexp(r) => write!(f, "/{}/", r.as_str()),
            Value::Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Record(r) => {
                f.write_str("{")?;
                for (i, (k, v)) in r.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Dict(d) => {
                if d.entries.is_empty() {
                    return f.write_str("[:]");
                }
                f.write_str("[")?;
                for (i, (k, v)) in d.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("]")
            }
            Value::Function(func) => write!(f, "<function: {}>", func.function_type()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
