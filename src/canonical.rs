//! Deterministic parameter canonicalization for request signing.
//!
//! The remote API authenticates search requests with a digest over a
//! canonical string built from the request fields. The canonical form sorts
//! top-level keys ascending by codepoint, flattens nested mappings and
//! sequences, and joins everything with `:`. [`SignFields`] is backed by a
//! `BTreeMap`, so the sorted order holds regardless of insertion order.
//!
//! Rendering rules match the wire contract's string coercion: null becomes
//! the empty string, `true` becomes `1`, `false` becomes the empty string,
//! integers render in decimal.

use std::collections::BTreeMap;

/// A scalar field value as it renders into the canonical string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Renders as the empty string
    Null,
    /// Renders as `1` (true) or the empty string (false)
    Bool(bool),
    /// Renders in decimal
    Int(i64),
    /// Renders as-is
    Str(String),
}

impl Scalar {
    fn render(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Bool(false) => String::new(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Scalar::Null,
        }
    }
}

/// A top-level field value: scalar, nested mapping, or sequence of mappings.
///
/// Nested mappings (passenger counts) flatten to their values joined with
/// `:` in sorted-key order. Sequences (flight segments) keep their element
/// order; only each element's own keys are sorted before flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single scalar value
    Scalar(Scalar),
    /// A nested mapping, flattened in sorted-key order
    Map(BTreeMap<String, Scalar>),
    /// A sequence of mappings, flattened element by element in order
    Seq(Vec<BTreeMap<String, Scalar>>),
}

impl FieldValue {
    /// Build a nested mapping value from key/scalar pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        FieldValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence value from an iterator of key/scalar pair groups.
    pub fn seq<K, V, E, I>(elements: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        E: IntoIterator<Item = (K, V)>,
        I: IntoIterator<Item = E>,
    {
        FieldValue::Seq(
            elements
                .into_iter()
                .map(|e| e.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
                .collect(),
        )
    }

    fn render(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.render(),
            FieldValue::Map(m) => m
                .values()
                .map(Scalar::render)
                .collect::<Vec<_>>()
                .join(":"),
            FieldValue::Seq(elements) => elements
                .iter()
                .map(|m| m.values().map(Scalar::render).collect::<Vec<_>>().join(":"))
                .collect::<Vec<_>>()
                .join(":"),
        }
    }

    /// The rendered scalar form of this value (flattened for nested values).
    pub fn as_rendered(&self) -> String {
        self.render()
    }
}

impl<T: Into<Scalar>> From<T> for FieldValue {
    fn from(v: T) -> Self {
        FieldValue::Scalar(v.into())
    }
}

/// The set of fields eligible for signing, keyed by field name.
///
/// Keys are held sorted ascending by raw byte order, which makes the
/// canonical join independent of insertion order by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignFields(BTreeMap<String, FieldValue>);

impl SignFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    /// Whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in sorted-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Join all field values with `:` in sorted-key order.
    pub fn canonical_join(&self) -> String {
        self.0
            .values()
            .map(FieldValue::render)
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for SignFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
