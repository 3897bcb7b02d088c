//! The dynamic value model walked by the traversal engine.
//!
//! Every value entering the engine is classified into exactly one shape:
//!
//! - [`Value::Null`]: an absent reference.
//! - [`Value::Scalar`]: a leaf payload; only [`Scalar::String`] is visible to
//!   scrub policies, every other kind is copied verbatim.
//! - [`Value::Reference`]: a present reference cell.
//! - [`Value::Record`]: named fields in declared order.
//! - [`Value::Sequence`]: ordered, indexable items.
//! - [`Value::Mapping`]: string-keyed entries, order-irrelevant.
//! - [`Value::Opaque`]: a shape the engine cannot inspect, carried verbatim
//!   with no processing of its interior.
//!
//! [`Sequence`] and [`Mapping`] keep an *absent* variant distinct from an
//! initialized-empty one. The engine never materializes an absent container
//! as empty in its output.

mod opaque;

pub use opaque::Opaque;

use std::collections::BTreeMap;
use std::fmt;

/// Leaf payloads at the bottom of the traversal.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Boolean payload.
    Bool(bool),
    /// Signed integer payload.
    Int(i64),
    /// Unsigned integer payload.
    UInt(u64),
    /// Floating-point payload.
    Float(f64),
    /// Single character payload.
    Char(char),
    /// String payload; the only scalar kind a scrub policy is consulted for.
    String(String),
}

impl Scalar {
    /// Returns the string payload if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for string scalars.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Scalar::String(_))
    }
}

/// A runtime value classified into one of the shapes the engine understands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// An absent reference.
    #[default]
    Null,
    /// A leaf payload.
    Scalar(Scalar),
    /// A present reference cell.
    Reference(Box<Value>),
    /// Named fields in declared order.
    Record(Record),
    /// Ordered, indexable items.
    Sequence(Sequence),
    /// String-keyed entries.
    Mapping(Mapping),
    /// A shape the engine cannot inspect; copied verbatim.
    Opaque(Opaque),
}

impl Value {
    /// Builds a string scalar.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(value.into()))
    }

    /// Wraps a value in a present reference cell.
    #[must_use]
    pub fn reference(value: Value) -> Self {
        Value::Reference(Box::new(value))
    }

    /// Classifies this value's shape.
    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        match self {
            Value::Null => ShapeKind::Null,
            Value::Scalar(_) => ShapeKind::Scalar,
            Value::Reference(_) => ShapeKind::Reference,
            Value::Record(_) => ShapeKind::Record,
            Value::Sequence(_) => ShapeKind::Sequence,
            Value::Mapping(_) => ShapeKind::Mapping,
            Value::Opaque(_) => ShapeKind::Opaque,
        }
    }

    /// Returns the string payload if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    /// Returns `true` for the absent reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Scalar(Scalar::UInt(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(Scalar::Float(value))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Scalar(Scalar::Char(value))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Value::Sequence(sequence)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Mapping(mapping)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

/// The shape a [`Value`] was classified into, used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// See [`Value::Null`].
    Null,
    /// See [`Value::Scalar`].
    Scalar,
    /// See [`Value::Reference`].
    Reference,
    /// See [`Value::Record`].
    Record,
    /// See [`Value::Sequence`].
    Sequence,
    /// See [`Value::Mapping`].
    Mapping,
    /// See [`Value::Opaque`].
    Opaque,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShapeKind::Null => "null",
            ShapeKind::Scalar => "a scalar",
            ShapeKind::Reference => "a reference",
            ShapeKind::Record => "a record",
            ShapeKind::Sequence => "a sequence",
            ShapeKind::Mapping => "a mapping",
            ShapeKind::Opaque => "an opaque value",
        };
        f.write_str(text)
    }
}

/// Named fields in declared order.
///
/// Field order is significant: the engine visits fields in the order they
/// were pushed, and derive-generated adapters push them in declaration order.
/// Names are not required to be unique, but adapters never produce duplicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Returns the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Removes and returns the first field with the given name, preserving
    /// the order of the remaining fields.
    ///
    /// Reconstruction consumes fields through this method so that flattened
    /// sub-records can pick up their promoted fields from the same namespace.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let position = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(position).1)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Ordered items, or the absent (uninitialized) variant.
///
/// `Sequence::default()` is absent, matching zero-value semantics: a field
/// that was never initialized stays distinguishable from one initialized to
/// an empty container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence {
    items: Option<Vec<Value>>,
}

impl Sequence {
    /// The absent (uninitialized) sequence.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// An initialized, empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Some(Vec::new()),
        }
    }

    /// Returns `true` for the absent variant.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.items.is_none()
    }

    /// Returns the items, or `None` for the absent variant.
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        self.items.as_deref()
    }

    /// Consumes the sequence, returning its items.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<Value>> {
        self.items
    }

    /// Appends an item, initializing the sequence if it was absent.
    pub fn push(&mut self, value: Value) {
        self.items.get_or_insert_with(Vec::new).push(value);
    }

    /// Number of items; zero for the absent variant.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Returns `true` when there are no items (absent or initialized-empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Self { items: Some(items) }
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: Some(iter.into_iter().collect()),
        }
    }
}

/// String-keyed entries, or the absent (uninitialized) variant.
///
/// Entries are kept in a `BTreeMap` so key visitation order is deterministic
/// across runs; the engine only requires each key to be visited exactly once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    entries: Option<BTreeMap<String, Value>>,
}

impl Mapping {
    /// The absent (uninitialized) mapping.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// An initialized, empty mapping.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Some(BTreeMap::new()),
        }
    }

    /// Returns `true` for the absent variant.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.entries.is_none()
    }

    /// Returns the entries, or `None` for the absent variant.
    #[must_use]
    pub fn entries(&self) -> Option<&BTreeMap<String, Value>> {
        self.entries.as_ref()
    }

    /// Consumes the mapping, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Option<BTreeMap<String, Value>> {
        self.entries
    }

    /// Inserts an entry, initializing the mapping if it was absent.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value)
    }

    /// Returns the value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.as_ref()?.get(key)
    }

    /// Number of entries; zero for the absent variant.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, BTreeMap::len)
    }

    /// Returns `true` when there are no entries (absent or initialized-empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<BTreeMap<String, Value>> for Mapping {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self {
            entries: Some(entries),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: Some(
                iter.into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            ),
        }
    }
}
