//! The resolved type language.
//!
//! `MonoType` is what the type checker leaves on every semantic node. A type
//! is *monomorphic* when it mentions no [`Tvar`]; the compiler requires that
//! of everything outside polymorphic function literals.
//!
//! Composite payloads are behind `Arc` so cloning a type, which the compiler
//! does for every node it builds, never deep-copies.

mod subst;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::Name;

pub use subst::{Substitution, UnifyError};

/// Primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasicType {
    Bool,
    Int,
    UInt,
    Float,
    String,
    Bytes,
    Time,
    Duration,
    Regexp,
}

impl BasicType {
    /// Source-level spelling of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Regexp => "regexp",
        }
    }
}

/// A type variable left by the checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tvar(pub u64);

impl fmt::Display for Tvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A resolved type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MonoType {
    Basic(BasicType),
    Var(Tvar),
    Array(Arc<MonoType>),
    Dict(Arc<DictType>),
    Record(Arc<RecordType>),
    Function(Arc<FunctionType>),
}

/// Key and value types of a dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DictType {
    pub key: MonoType,
    pub value: MonoType,
}

/// One labelled field of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Property {
    pub key: Name,
    pub value: MonoType,
}

/// A record type.
///
/// `fields` may repeat a label: record extension appends the overriding
/// field after the original. Lookup always takes the last match. `tail`
/// is the row variable of an extensible record (`{t0 with a: int}`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub fields: Vec<Property>,
    pub tail: Option<Tvar>,
}

impl RecordType {
    /// Type of the field named `key`, last match wins.
    pub fn field(&self, key: &str) -> Option<&MonoType> {
        self.fields
            .iter()
            .rev()
            .find(|p| p.key.as_str() == key)
            .map(|p| &p.value)
    }

    /// Whether every field of the record is known.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tail.is_none()
    }
}

/// A named function parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: Name,
    pub typ: MonoType,
    /// The parameter has a default and may be omitted at call sites.
    pub optional: bool,
    /// The parameter receives the left-hand side of `|>`.
    pub pipe: bool,
}

impl Parameter {
    /// A required, non-pipe parameter.
    pub fn new(name: impl Into<Name>, typ: MonoType) -> Self {
        Parameter {
            name: name.into(),
            typ,
            optional: false,
            pipe: false,
        }
    }

    /// Mark the parameter as having a default.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the parameter as the pipe-forward receiver.
    #[must_use]
    pub fn pipe(mut self) -> Self {
        self.pipe = true;
        self
    }
}

/// A function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub parameters: Vec<Parameter>,
    pub retn: MonoType,
}

impl FunctionType {
    /// Find a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name.as_str() == name)
    }

    /// The pipe-forward parameter, if the function declares one.
    pub fn pipe_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.pipe)
    }
}

// Constructors

impl MonoType {
    pub const BOOL: MonoType = MonoType::Basic(BasicType::Bool);
    pub const INT: MonoType = MonoType::Basic(BasicType::Int);
    pub const UINT: MonoType = MonoType::Basic(BasicType::UInt);
    pub const FLOAT: MonoType = MonoType::Basic(BasicType::Float);
    pub const STRING: MonoType = MonoType::Basic(BasicType::String);
    pub const BYTES: MonoType = MonoType::Basic(BasicType::Bytes);
    pub const TIME: MonoType = MonoType::Basic(BasicType::Time);
    pub const DURATION: MonoType = MonoType::Basic(BasicType::Duration);
    pub const REGEXP: MonoType = MonoType::Basic(BasicType::Regexp);

    /// A type variable.
    #[inline]
    pub fn var(id: u64) -> Self {
        MonoType::Var(Tvar(id))
    }

    /// `[element]`
    pub fn array(element: MonoType) -> Self {
        MonoType::Array(Arc::new(element))
    }

    /// `[key: value]`
    pub fn dict(key: MonoType, value: MonoType) -> Self {
        MonoType::Dict(Arc::new(DictType { key, value }))
    }

    /// A closed record type with fields in the given order.
    pub fn record<K: Into<Name>>(fields: impl IntoIterator<Item = (K, MonoType)>) -> Self {
        Self::record_type(fields, None)
    }

    /// An extensible record type `{tail with fields...}`.
    pub fn extensible_record<K: Into<Name>>(
        tail: Tvar,
        fields: impl IntoIterator<Item = (K, MonoType)>,
    ) -> Self {
        Self::record_type(fields, Some(tail))
    }

    fn record_type<K: Into<Name>>(
        fields: impl IntoIterator<Item = (K, MonoType)>,
        tail: Option<Tvar>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(key, value)| Property {
                key: key.into(),
                value,
            })
            .collect();
        MonoType::Record(Arc::new(RecordType { fields, tail }))
    }

    /// `(params...) => retn`
    pub fn function(parameters: Vec<Parameter>, retn: MonoType) -> Self {
        MonoType::Function(Arc::new(FunctionType { parameters, retn }))
    }
}

// Queries

impl MonoType {
    /// The record payload, if this is a record type.
    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            MonoType::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The function payload, if this is a function type.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            MonoType::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Element type of an array type.
    pub fn element_type(&self) -> Option<&MonoType> {
        match self {
            MonoType::Array(e) => Some(e),
            _ => None,
        }
    }

    /// Key/value types of a dictionary type.
    pub fn as_dict(&self) -> Option<&DictType> {
        match self {
            MonoType::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Whether the type mentions no type variable.
    pub fn is_monomorphic(&self) -> bool {
        match self {
            MonoType::Basic(_) => true,
            MonoType::Var(_) => false,
            MonoType::Array(e) => e.is_monomorphic(),
            MonoType::Dict(d) => d.key.is_monomorphic() && d.value.is_monomorphic(),
            MonoType::Record(r) => {
                r.tail.is_none() && r.fields.iter().all(|p| p.value.is_monomorphic())
            }
            MonoType::Function(f) => {
                f.retn.is_monomorphic() && f.parameters.iter().all(|p| p.typ.is_monomorphic())
            }
        }
    }

    /// Every type variable mentioned by this type.
    pub fn free_vars(&self) -> FxHashSet<Tvar> {
        let mut vars = FxHashSet::default();
        self.collect_vars(&mut vars);
        vars
    }

    /// Add every type variable mentioned by this type to `out`.
    pub fn collect_vars(&self, out: &mut FxHashSet<Tvar>) {
        match self {
            MonoType::Basic(_) => {}
            MonoType::Var(v) => {
                out.insert(*v);
            }
            MonoType::Array(e) => e.collect_vars(out),
            MonoType::Dict(d) => {
                d.key.collect_vars(out);
                d.value.collect_vars(out);
            }
            MonoType::Record(r) => {
                if let Some(tail) = r.tail {
                    out.insert(tail);
                }
                for p in &r.fields {
                    p.value.collect_vars(out);
                }
            }
            MonoType::Function(f) => {
                for p in &f.parameters {
                    p.typ.collect_vars(out);
                }
                f.retn.collect_vars(out);
            }
        }
    }

    /// Whether `var` occurs anywhere in this type.
    pub fn contains_var(&self, var: Tvar) -> bool {
        match self {
            MonoType::Basic(_) => false,
            MonoType::Var(v) => *v == var,
            MonoType::Array(e) => e.contains_var(var),
            MonoType::Dict(d) => d.key.contains_var(var) || d.value.contains_var(var),
            MonoType::Record(r) => {
                r.tail == Some(var) || r.fields.iter().any(|p| p.value.contains_var(var))
            }
            MonoType::Function(f) => {
                f.retn.contains_var(var) || f.parameters.iter().any(|p| p.typ.contains_var(var))
            }
        }
    }
}

// Display

impl fmt::Display for MonoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonoType::Basic(b) => f.write_str(b.name()),
            MonoType::Var(v) => write!(f, "{v}"),
            MonoType::Array(e) => write!(f, "[{e}]"),
            MonoType::Dict(d) => write!(f, "[{}: {}]", d.key, d.value),
            MonoType::Record(r) => write!(f, "{r}"),
            MonoType::Function(func) => write!(f, "{func}"),
        }
    }
}

impl fmt::Display for RecordType {
    /// Fields are listed stably sorted by label, so duplicates keep their
    /// relative order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&Property> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.key.cmp(&b.key));

        f.write_str("{")?;
        if let Some(tail) = self.tail {
            write!(f, "{tail}")?;
            if !fields.is_empty() {
                f.write_str(" with ")?;
            }
        }
        for (i, p) in fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", p.key, p.value)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if p.pipe {
                f.write_str("<-")?;
            } else if p.optional {
                f.write_str("?")?;
            }
            write!(f, "{}: {}", p.name, p.typ)?;
        }
        write!(f, ") => {}", self.retn)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
