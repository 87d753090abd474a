//! Composite value payloads: arrays, records, dictionaries and regexps.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use flux_semantic::{MonoType, Name};
use indexmap::IndexMap;

use super::Value;

/// An ordered sequence of values of one element type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Array {
    pub(crate) element: MonoType,
    pub(crate) elements: Vec<Value>,
}

impl Array {
    pub fn element_type(&self) -> &MonoType {
        &self.element
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a signed index, `None` when out of range.
    pub fn get(&self, index: i64) -> Option<&Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.elements.get(i))
    }
}

/// An ordered list of labelled values.
///
/// Labels may repeat after record extension; [`Record::get`] returns the
/// last entry with a given label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub(crate) fields: Vec<(Name, Value)>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(Name, Value)] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.fields.iter().map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record's type, built from the types of its current values.
    pub fn typ(&self) -> MonoType {
        MonoType::record(self.fields.iter().map(|(k, v)| (k.clone(), v.typ())))
    }
}

/// A mapping with homogeneous key and value types.
///
/// Entries keep insertion order for display, but equality ignores order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    pub(crate) key: MonoType,
    pub(crate) value: MonoType,
    pub(crate) entries: IndexMap<Value, Value>,
}

impl Dictionary {
    pub fn key_type(&self) -> &MonoType {
        &self.key
    }

    pub fn value_type(&self) -> &MonoType {
        &self.value
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Hash for Dictionary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent to agree with `Eq`.
        self.key.hash(state);
        self.value.hash(state);
        self.entries.len().hash(state);
    }
}

/// A compiled regular expression.
///
/// Two regexps are equal when their source patterns are.
#[derive(Clone)]
pub struct Regexp(Arc<regex::Regex>);

impl Regexp {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|re| Regexp(Arc::new(re)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl From<regex::Regex> for Regexp {
    fn from(re: regex::Regex) -> Self {
        Regexp(Arc::new(re))
    }
}

impl PartialEq for Regexp {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Regexp {}

impl Hash for Regexp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for Regexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}
