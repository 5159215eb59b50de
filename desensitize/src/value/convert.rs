//! Conversions between Rust types and [`Value`].
//!
//! `Vec`/`VecDeque` become lists, sets become sets, maps become maps and boxed
//! slices become arrays. `Option` is transparent: `None` is [`Value::Null`].
//! `Box<T>` and `Arc<T>` convert through their contents.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use super::Value;
use crate::error::ValueError;

/// Converts a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Rebuilds a Rust value from a (possibly masked) [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, ValueError> {
    Err(ValueError::Mismatch {
        expected,
        found: value.kind(),
    })
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

// =============================================================================
// Scalars
// =============================================================================

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self.into())
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.into())
    }
}

impl IntoValue for Arc<str> {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => Ok(text.as_ref().to_owned()),
            other => mismatch("text", &other),
        }
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => Ok(text),
            other => mismatch("text", &other),
        }
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Text(self.to_string().into())
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        let Value::Text(text) = &value else {
            return mismatch("single-character text", &value);
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => mismatch("single-character text", &value),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => mismatch("bool", &other),
        }
    }
}

macro_rules! impl_integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(int) => <$ty>::try_from(int).map_err(|_| ValueError::OutOfRange {
                            value: int.to_string(),
                            target: stringify!($ty),
                        }),
                        other => mismatch("int", &other),
                    }
                }
            }
        )*
    };
}

impl_integer_value!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_wide_integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                /// Values beyond `i64::MAX` saturate.
                fn into_value(self) -> Value {
                    Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(int) => <$ty>::try_from(int).map_err(|_| ValueError::OutOfRange {
                            value: int.to_string(),
                            target: stringify!($ty),
                        }),
                        other => mismatch("int", &other),
                    }
                }
            }
        )*
    };
}

impl_wide_integer_value!(u64, usize, isize);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(float) => Ok(float),
            Value::Int(int) => Ok(int as f64),
            other => mismatch("float", &other),
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|float| float as f32)
    }
}

// =============================================================================
// Transparent wrappers
// =============================================================================

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Box<T> {
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: IntoValue + Clone> IntoValue for Arc<T> {
    fn into_value(self) -> Value {
        Arc::unwrap_or_clone(self).into_value()
    }
}

impl<T: FromValue> FromValue for Arc<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Arc::new)
    }
}

// =============================================================================
// Sequences
// =============================================================================

fn elements<T: FromValue>(expected: &'static str, value: Value) -> Result<Vec<T>, ValueError> {
    match value.as_elements() {
        Some(items) => items.iter().cloned().map(T::from_value).collect(),
        None => mismatch(expected, &value),
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::list(self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements("list", value)
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::list(self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements("list", value).map(VecDeque::from)
    }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn into_value(self) -> Value {
        Value::array(self.into_vec().into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements("array", value).map(Vec::into_boxed_slice)
    }
}

// =============================================================================
// Sets
// =============================================================================

impl<T: IntoValue, S> IntoValue for HashSet<T, S> {
    fn into_value(self) -> Value {
        Value::set(self.into_iter().map(IntoValue::into_value))
    }
}

impl<T, S> FromValue for HashSet<T, S>
where
    T: FromValue + Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        // NOTE: masking can collapse distinct elements into equal ones, so the
        // rebuilt set may be smaller than the original.
        elements("set", value).map(|items: Vec<T>| items.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::set(self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements("set", value).map(|items: Vec<T>| items.into_iter().collect())
    }
}

// =============================================================================
// Maps
// =============================================================================

fn entries<K, V, C>(value: Value) -> Result<C, ValueError>
where
    K: FromValue,
    V: FromValue,
    C: FromIterator<(K, V)>,
{
    match value.as_entries() {
        Some(entries) => entries
            .iter()
            .cloned()
            .map(|(key, value)| Ok((K::from_value(key)?, V::from_value(value)?)))
            .collect(),
        None => mismatch("map", &value),
    }
}

impl<K: IntoValue, V: IntoValue, S> IntoValue for HashMap<K, V, S> {
    fn into_value(self) -> Value {
        Value::map(
            self.into_iter()
                .map(|(key, value)| (key.into_value(), value.into_value())),
        )
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Hash + Eq,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        entries(value)
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(
            self.into_iter()
                .map(|(key, value)| (key.into_value(), value.into_value())),
        )
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        entries(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn option_none_is_null() {
        let none: Option<String> = None;
        assert!(none.into_value().is_null());
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn vec_round_trips_through_list() {
        let value = vec!["a".to_string(), "b".to_string()].into_value();
        assert_eq!(value.kind(), ValueKind::List);
        let back = Vec::<String>::from_value(value).unwrap();
        assert_eq!(back, vec!["a", "b"]);
    }

    #[test]
    fn boxed_slice_is_array() {
        let value = vec![1u8, 2, 3].into_boxed_slice().into_value();
        assert_eq!(value.kind(), ValueKind::Array);
    }

    #[test]
    fn integer_out_of_range_is_reported() {
        let err = u8::from_value(Value::Int(300)).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { target: "u8", .. }));
    }

    #[test]
    fn text_into_int_is_mismatch() {
        let err = i32::from_value(Value::text("12")).unwrap_err();
        assert!(matches!(
            err,
            ValueError::Mismatch {
                found: ValueKind::Text,
                ..
            }
        ));
    }

    #[test]
    fn set_rebuild_collapses_equal_elements() {
        let value = Value::List(vec![Value::text("x"), Value::text("x")].into());
        let set = HashSet::<String>::from_value(value).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn map_round_trip() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 7i32);
        let value = map.clone().into_value();
        assert_eq!(value.get(&Value::text("k")), Some(&Value::Int(7)));
        assert_eq!(BTreeMap::<String, i32>::from_value(value).unwrap(), map);
    }

    #[test]
    fn char_requires_single_character() {
        assert_eq!(char::from_value(Value::text("*")).unwrap(), '*');
        assert!(char::from_value(Value::text("**")).is_err());
    }
}
