//! Declared-type metadata for Rust types.
//!
//! [`Describe`] maps a Rust type onto the names the descriptor builder
//! understands: sequences describe as `List`, sets as `Set`, maps as `Map`,
//! boxed slices as arrays. `Option`, `Box` and `Arc` are transparent.
//! `#[derive(Cascade)]` implements it for derived types.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    sync::Arc,
};

use super::metadata::TypeMetadata;
use crate::value::Value;

/// Provides the declared-type metadata of a Rust type.
pub trait Describe {
    fn type_metadata() -> TypeMetadata;
}

macro_rules! describe_scalar {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn type_metadata() -> TypeMetadata {
                    TypeMetadata::class($name)
                }
            }
        )*
    };
}

describe_scalar! {
    String => "String",
    Arc<str> => "String",
    char => "char",
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    Value => "Object",
}

impl<T: Describe> Describe for Option<T> {
    fn type_metadata() -> TypeMetadata {
        T::type_metadata()
    }
}

impl<T: Describe> Describe for Box<T> {
    fn type_metadata() -> TypeMetadata {
        T::type_metadata()
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn type_metadata() -> TypeMetadata {
        T::type_metadata()
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::array(T::type_metadata())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("List", [T::type_metadata()])
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("List", [T::type_metadata()])
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("Set", [T::type_metadata()])
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("Set", [T::type_metadata()])
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("Map", [K::type_metadata(), V::type_metadata()])
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::generic("Map", [K::type_metadata(), V::type_metadata()])
    }
}

#[cfg(feature = "json")]
impl Describe for serde_json::Value {
    fn type_metadata() -> TypeMetadata {
        TypeMetadata::class("Object")
    }
}
