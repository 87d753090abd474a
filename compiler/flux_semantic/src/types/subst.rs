//! Type-variable substitution and one-way structural matching.
//!
//! The compiler never infers. The only solving it does is to match each
//! parameter annotation (the *expected* side, which may mention variables)
//! against the concrete input type (the *actual* side) and then apply the
//! resulting substitution to every annotation it meets.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{DictType, FunctionType, MonoType, Parameter, Property, RecordType, Tvar};

/// Failure to match two types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    #[error("expected {expected} (argument {actual})")]
    Mismatch { expected: MonoType, actual: MonoType },
    #[error("type variable {var} occurs in {typ}")]
    Occurs { var: Tvar, typ: MonoType },
}

/// Mapping from type variables to the types they stand for.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    bindings: FxHashMap<Tvar, MonoType>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// The type `var` is bound to, if any.
    pub fn get(&self, var: Tvar) -> Option<&MonoType> {
        self.bindings.get(&var)
    }

    /// Resolve every bound variable in `typ`, recursively.
    ///
    /// A record whose tail is bound to another record is flattened: the
    /// tail's fields come first so the head's fields keep winning lookups.
    pub fn apply(&self, typ: &MonoType) -> MonoType {
        if self.bindings.is_empty() {
            return typ.clone();
        }
        match typ {
            MonoType::Basic(_) => typ.clone(),
            MonoType::Var(v) => match self.bindings.get(v) {
                Some(bound) => self.apply(bound),
                None => typ.clone(),
            },
            MonoType::Array(e) => MonoType::Array(Arc::new(self.apply(e))),
            MonoType::Dict(d) => MonoType::Dict(Arc::new(DictType {
                key: self.apply(&d.key),
                value: self.apply(&d.value),
            })),
            MonoType::Record(r) => MonoType::Record(Arc::new(self.apply_record(r))),
            MonoType::Function(f) => MonoType::Function(Arc::new(FunctionType {
                parameters: f
                    .parameters
                    .iter()
                    .map(|p| Parameter {
                        typ: self.apply(&p.typ),
                        ..p.clone()
                    })
                    .collect(),
                retn: self.apply(&f.retn),
            })),
        }
    }

    fn apply_record(&self, r: &RecordType) -> RecordType {
        let head = r.fields.iter().map(|p| Property {
            key: p.key.clone(),
            value: self.apply(&p.value),
        });

        let Some(tail) = r.tail else {
            return RecordType {
                fields: head.collect(),
                tail: None,
            };
        };

        match self.apply(&MonoType::Var(tail)) {
            MonoType::Record(resolved) => {
                let mut fields = resolved.fields.clone();
                fields.extend(head);
                RecordType {
                    fields,
                    tail: resolved.tail,
                }
            }
            MonoType::Var(v) => RecordType {
                fields: head.collect(),
                tail: Some(v),
            },
            // A tail bound to a non-record is rejected by `bind`.
            _ => RecordType {
                fields: head.collect(),
                tail: Some(tail),
            },
        }
    }

    /// Match `expected` against `actual`, extending the substitution.
    ///
    /// Fields required by an expected record but missing from the actual
    /// record are not an error here: the parameter simply evaluates to null
    /// for them. An expected record's tail absorbs the actual fields the
    /// head does not mention.
    pub fn unify(&mut self, expected: &MonoType, actual: &MonoType) -> Result<(), UnifyError> {
        let expected = self.apply(expected);
        let actual = self.apply(actual);
        match (&expected, &actual) {
            (MonoType::Var(a), MonoType::Var(b)) if a == b => Ok(()),
            (MonoType::Var(v), _) => self.bind(*v, actual.clone()),
            (_, MonoType::Var(v)) => self.bind(*v, expected.clone()),
            (MonoType::Basic(a), MonoType::Basic(b)) if a == b => Ok(()),
            (MonoType::Array(a), MonoType::Array(b)) => self.unify(a, b),
            (MonoType::Dict(a), MonoType::Dict(b)) => {
                self.unify(&a.key, &b.key)?;
                self.unify(&a.value, &b.value)
            }
            (MonoType::Record(a), MonoType::Record(b)) => self.unify_records(a, b),
            (MonoType::Function(a), MonoType::Function(b)) => {
                self.unify_functions(a, b, &expected, &actual)
            }
            _ => Err(UnifyError::Mismatch { expected, actual }),
        }
    }

    fn unify_records(
        &mut self,
        expected: &RecordType,
        actual: &RecordType,
    ) -> Result<(), UnifyError> {
        for p in &expected.fields {
            if let Some(found) = actual.field(&p.key) {
                self.unify(&p.value, found)?;
            }
        }
        if let Some(tail) = expected.tail {
            let leftover: Vec<Property> = actual
                .fields
                .iter()
                .filter(|p| expected.field(&p.key).is_none())
                .cloned()
                .collect();
            let rest = MonoType::Record(Arc::new(RecordType {
                fields: leftover,
                tail: actual.tail,
            }));
            self.bind(tail, rest)?;
        }
        Ok(())
    }

    fn unify_functions(
        &mut self,
        expected: &FunctionType,
        actual: &FunctionType,
        expected_ty: &MonoType,
        actual_ty: &MonoType,
    ) -> Result<(), UnifyError> {
        let mismatch = || UnifyError::Mismatch {
            expected: expected_ty.clone(),
            actual: actual_ty.clone(),
        };
        if expected.parameters.len() != actual.parameters.len() {
            return Err(mismatch());
        }
        for p in &expected.parameters {
            let Some(q) = actual.parameter(&p.name) else {
                return Err(mismatch());
            };
            if p.pipe != q.pipe {
                return Err(mismatch());
            }
            self.unify(&p.typ, &q.typ)?;
        }
        self.unify(&expected.retn, &actual.retn)
    }

    /// Bind `var` to `typ`. A variable that is already bound is unified
    /// with its current binding instead of being overwritten.
    fn bind(&mut self, var: Tvar, typ: MonoType) -> Result<(), UnifyError> {
        if let MonoType::Var(v) = typ {
            if v == var {
                return Ok(());
            }
        }
        if typ.contains_var(var) {
            return Err(UnifyError::Occurs { var, typ });
        }
        if let Some(existing) = self.bindings.get(&var).cloned() {
            return self.unify(&existing, &typ);
        }
        self.bindings.insert(var, typ);
        Ok(())
    }
}

impl FromIterator<(Tvar, MonoType)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Tvar, MonoType)>>(iter: I) -> Self {
        Substitution {
            bindings: iter.into_iter().collect(),
        }
    }
}
