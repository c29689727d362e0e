//! Documents and the query primitives used to read and write them.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{ObjectId, StoreError};

/// A stored record: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier of every document.
pub const ID_FIELD: &str = "_id";

/// Serialize a value into a [`Document`].
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotADocument(other.to_string())),
    }
}

/// Equality constraints a document must satisfy to match.
///
/// An array field matches when it equals the value or contains it. A missing
/// field only matches `null`. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field` to `value`, replacing any earlier constraint on it.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Constrain the document identifier.
    pub fn id(self, id: &ObjectId) -> Self {
        self.eq(ID_FIELD, id.to_string())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.conditions.iter_mut().find(|(name, _)| *name == field) {
            Some(existing) => existing.1 = value,
            None => self.conditions.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| match document.get(field) {
                Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
                Some(actual) => actual == expected,
                None => expected.is_null(),
            })
    }
}

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `1` for ascending, `-1` for descending.
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Ordered list of sort keys. Earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<(String, SortDirection)>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SortSpec::push`].
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.push(field, direction);
        self
    }

    /// Append a key. A field already present keeps its position and takes
    /// the new direction.
    pub fn push(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.keys.iter_mut().find(|(name, _)| *name == field) {
            Some(existing) => existing.1 = direction,
            None => self.keys.push((field, direction)),
        }
    }

    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, direction)| *direction)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.keys.iter().map(|(f, d)| (f.as_str(), *d))
    }

    /// The keys as `(field, ±1)` pairs.
    pub fn to_pairs(&self) -> Vec<(String, i32)> {
        self.keys
            .iter()
            .map(|(field, direction)| (field.clone(), direction.as_i32()))
            .collect()
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for (field, direction) in &self.keys {
            let ordering = compare_values(a.get(field), b.get(field));
            let ordering = match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Fields to return from a read. Empty means every field; the identifier is
/// always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut projection = Self::default();
        for field in fields {
            let field = field.into();
            if !projection.fields.contains(&field) {
                projection.fields.push(field);
            }
        }
        projection
    }

    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn apply(&self, mut document: Document) -> Document {
        if self.is_all() {
            return document;
        }
        document.retain(|field, _| field == ID_FIELD || self.fields.contains(field));
        document
    }
}

/// Rank of a value's type in sort order: missing and null first, then
/// numbers, RFC 3339 timestamps, other strings, objects, arrays and booleans.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(text)) if parse_instant(text).is_some() => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Object(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Bool(_)) => 6,
    }
}

fn parse_instant(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Total order over optional JSON values.
///
/// Timestamps sort before other strings and compare as instants, with the
/// text breaking ties between equal instants.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_instant(x), parse_instant(y)) {
                (Some(left), Some(right)) => left.cmp(&right).then_with(|| x.cmp(y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = compare_values(Some(left), Some(right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
