//! Lexical scopes for evaluation.
//!
//! A scope is a chain of frames. Each frame owns its bindings and holds a
//! shared reference to its parent. Frames are filled while they are still
//! uniquely owned and never mutated once wrapped in an `Arc`, which is what
//! lets closures capture them and many threads read them at once.

use std::sync::Arc;

use flux_semantic::Name;
use flux_values::{EvalError, Value};
use rustc_hash::FxHashMap;

/// A single frame of variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Bindings in this frame (`FxHashMap` for faster hashing with `Name` keys).
    values: FxHashMap<Name, Value>,
    /// Enclosing frame.
    parent: Option<Arc<Scope>>,
}

impl Scope {
    /// Create an empty frame with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root frame holding `values`.
    pub fn from_values<K: Into<Name>>(values: impl IntoIterator<Item = (K, Value)>) -> Self {
        Scope {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            parent: None,
        }
    }

    /// Create an empty frame whose parent is `parent`.
    pub fn child(parent: &Arc<Scope>) -> Self {
        Scope {
            values: FxHashMap::default(),
            parent: Some(Arc::clone(parent)),
        }
    }

    /// Bind `name` in this frame only, shadowing any outer binding.
    #[inline]
    pub fn set(&mut self, name: Name, value: Value) {
        self.values.insert(name, value);
    }

    /// Look up `name`, walking outward through enclosing frames.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.values.get(name) {
                return Some(value);
            }
            frame = frame.parent.as_deref()?;
        }
    }

    /// Like [`lookup`](Self::lookup), failing with the internal
    /// unresolved-identifier error.
    pub fn get(&self, name: &Name) -> Result<&Value, EvalError> {
        self.lookup(name)
            .ok_or_else(|| EvalError::UnresolvedIdentifier { name: name.clone() })
    }

    /// Whether `name` is bound in this frame or any enclosing one.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The enclosing frame, if any.
    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    /// Number of bindings in this frame, excluding parents.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a base scope for [`compile`](crate::compile) from outer bindings.
///
/// `None` stays `None`: there is no base scope rather than an empty one.
pub fn to_scope(values: Option<&[(Name, Value)]>) -> Option<Arc<Scope>> {
    values.map(|values| Arc::new(Scope::from_values(values.iter().cloned())))
}
