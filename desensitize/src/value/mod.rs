//! Runtime values handed to the masking engine.
//!
//! A [`Value`] is the boxed, dynamically shaped form of a method argument or
//! return value. Every container variant holds its contents behind an `Arc`, so
//! cloning a value never copies data and [`Value::ptr_eq`] can tell whether a
//! masking pass returned the original allocation untouched.
//!
//! Values are never mutated in place. Masking builds new containers holding the
//! replacement leaves, which keeps the original observable to any other holder.

mod convert;
#[cfg(feature = "json")]
mod json;

use std::{
    collections::{HashMap, HashSet, hash_map::DefaultHasher},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

pub use convert::{FromValue, IntoValue};

use crate::cascade::Reconstruct;

/// A dynamically shaped runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    /// Fixed-length sequence.
    Array(Arc<[Value]>),
    /// Ordered collection.
    List(Arc<[Value]>),
    /// Unordered collection of unique elements.
    Set(Arc<[Value]>),
    /// Keyed collection with unique keys.
    Map(Arc<[(Value, Value)]>),
    /// Instance of a type exposing the [`Reconstruct`] capability.
    Object(Arc<dyn Reconstruct>),
}

/// Discriminant of a [`Value`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Array,
    List,
    Set,
    Map,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Array => "array",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::Map => "map",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Self::Text(value.into())
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Array(items.into_iter().collect())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::List(items.into_iter().collect())
    }

    /// Builds a set, dropping later duplicates.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Set(dedup_elements(items).into())
    }

    /// Builds a map. When a key repeats, the later value replaces the earlier
    /// one while the entry keeps its first position.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Self::Map(dedup_entries(entries).into())
    }

    /// Wraps an object exposing the cascade capability.
    pub fn object<T>(object: T) -> Self
    where
        T: Reconstruct,
    {
        Self::Object(Arc::new(object))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Array(_) => ValueKind::Array,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Elements of an array, list or set.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Reconstruct> {
        match self {
            Value::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Downcasts an object value to its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Looks up a map entry by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_entries()?
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` when both values share the same allocation.
    ///
    /// Scalars carry no allocation and compare by value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b))
            | (Value::List(a), Value::List(b))
            | (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

pub(crate) fn dedup_elements<I>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    let mut seen: HashSet<Value> = HashSet::new();
    let mut result = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            result.push(item);
        }
    }
    result
}

pub(crate) fn dedup_entries<I>(entries: I) -> Vec<(Value, Value)>
where
    I: IntoIterator<Item = (Value, Value)>,
{
    let mut positions: HashMap<Value, usize> = HashMap::new();
    let mut result: Vec<(Value, Value)> = Vec::new();
    for (key, value) in entries {
        if let Some(&index) = positions.get(&key) {
            result[index].1 = value;
        } else {
            positions.insert(key.clone(), result.len());
            result.push((key, value));
        }
    }
    result
}

// =============================================================================
// Structural equality and hashing
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
            }
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.type_name() == b.type_name() && a.field_values() == b.field_values())
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

fn unordered_hash<'a, I, T>(items: I) -> u64
where
    I: IntoIterator<Item = &'a T>,
    T: Hash + 'a,
{
    items.into_iter().fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(value) => value.hash(state),
            Value::Int(value) => value.hash(state),
            Value::Float(value) => value.to_bits().hash(state),
            Value::Text(value) => value.hash(state),
            Value::Array(items) | Value::List(items) => items.hash(state),
            Value::Set(items) => unordered_hash(items.iter()).hash(state),
            Value::Map(entries) => unordered_hash(entries.iter()).hash(state),
            Value::Object(object) => {
                object.type_name().hash(state);
                object.field_values().hash(state);
            }
        }
    }
}

// =============================================================================
// Display
// =============================================================================

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, open: &str, items: I, close: &str) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    f.write_str(open)?;
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{:?}", value.as_ref()),
            Value::Array(items) | Value::List(items) => write_joined(f, "[", items.iter(), "]"),
            Value::Set(items) => write_joined(f, "{", items.iter(), "}"),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Object(object) => {
                write!(f, "{} {{", object.type_name())?;
                let names = object.field_names();
                for (index, (name, value)) in names.iter().zip(object.field_values()).enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_allocation() {
        let value = Value::list([Value::text("a"), Value::text("b")]);
        let copy = value.clone();
        assert!(value.ptr_eq(&copy));
    }

    #[test]
    fn equal_but_distinct_lists_are_not_ptr_eq() {
        let a = Value::list([Value::text("a")]);
        let b = Value::list([Value::text("a")]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn set_drops_duplicates() {
        let set = Value::set([Value::text("a"), Value::text("b"), Value::text("a")]);
        assert_eq!(set.as_elements().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn set_equality_ignores_order() {
        let a = Value::set([Value::Int(1), Value::Int(2)]);
        let b = Value::set([Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn map_later_value_wins_first_position_kept() {
        let map = Value::map([
            (Value::text("k"), Value::Int(1)),
            (Value::text("other"), Value::Int(2)),
            (Value::text("k"), Value::Int(3)),
        ]);
        let entries = map.as_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Value::text("k"), Value::Int(3)));
        assert_eq!(map.get(&Value::text("other")), Some(&Value::Int(2)));
    }

    #[test]
    fn display_renders_nested_values() {
        let value = Value::map([(
            Value::text("emails"),
            Value::list([Value::text("a@b.c"), Value::Null]),
        )]);
        assert_eq!(value.to_string(), r#"{"emails": ["a@b.c", null]}"#);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Int(1).kind().to_string(), "int");
        assert_eq!(Value::default().kind(), ValueKind::Null);
    }
}
