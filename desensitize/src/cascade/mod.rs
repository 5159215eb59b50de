//! Cascade capability: field enumeration and reconstruction.
//!
//! A cascaded position asks the engine to walk an object's fields. Since
//! values are never mutated, the engine needs two things from the object:
//! its traversable field values, and a way to build a fresh instance from
//! replacement values. [`Reconstruct`] provides both through a trait object;
//! [`Cascade`] adds the static field declarations used to resolve field
//! shapes once, when the type is registered.
//!
//! Both are normally generated by `#[derive(Cascade)]`:
//!
//! ```rust
//! use desensitize::{Cascade, Email, PhoneNumber};
//!
//! #[derive(Clone, Debug, Cascade)]
//! struct Person {
//!     #[sensitive(PhoneNumber)]
//!     phone_number: String,
//!     #[sensitive(Email)]
//!     email: String,
//! }
//! ```

mod registry;

use std::{any::Any, fmt};

pub use registry::{CascadeBinding, CascadeRegistry};

use crate::{
    error::{ConfigError, MaskError},
    shape::TypeMetadata,
    value::Value,
};

/// Object-safe access to an object's traversable fields.
///
/// Implementations must report field names and values in the same order as
/// [`Cascade::fields`], and [`rebuild`](Reconstruct::rebuild) must accept
/// values in that order. Fields excluded from traversal are not reported
/// and are copied from `self` on rebuild.
pub trait Reconstruct: fmt::Debug + Send + Sync + 'static {
    /// Declared type name, used to find the cascade binding.
    fn type_name(&self) -> &'static str;

    fn field_names(&self) -> &'static [&'static str];

    fn field_values(&self) -> Vec<Value>;

    /// Builds a new instance from replacement field values.
    fn rebuild(&self, fields: Vec<Value>) -> Result<Value, MaskError>;

    fn as_any(&self) -> &dyn Any;
}

/// Static field declarations of a cascadable type.
pub trait Cascade: Reconstruct + Sized {
    const TYPE_NAME: &'static str;

    /// Names of the generic type parameters, in declaration order.
    fn type_params() -> &'static [&'static str] {
        &[]
    }

    /// Declared metadata of every traversable field.
    fn fields() -> Vec<FieldMetadata>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Declared {
    Metadata(TypeMetadata),
    Signature(&'static str),
}

/// Declared type of one traversable field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMetadata {
    name: &'static str,
    declared: Declared,
}

impl FieldMetadata {
    pub fn new(name: &'static str, metadata: TypeMetadata) -> Self {
        Self {
            name,
            declared: Declared::Metadata(metadata),
        }
    }

    /// Field whose declared type is given as a signature string, parsed on
    /// registration.
    pub fn signature(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            declared: Declared::Signature(signature),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_metadata(&self) -> Result<TypeMetadata, ConfigError> {
        match &self.declared {
            Declared::Metadata(metadata) => Ok(metadata.clone()),
            Declared::Signature(signature) => TypeMetadata::parse(signature),
        }
    }
}

#[doc(hidden)]
pub mod __private {
    //! Helpers called from `#[derive(Cascade)]` output.

    use std::vec::IntoIter;

    use crate::{
        error::{MaskError, ValueError},
        value::{FromValue, IntoValue, Value},
    };

    pub fn field_value<T>(field: &T) -> Value
    where
        T: IntoValue + Clone,
    {
        field.clone().into_value()
    }

    pub fn take_field<T>(
        fields: &mut IntoIter<Value>,
        type_name: &'static str,
        field: &'static str,
    ) -> Result<T, MaskError>
    where
        T: FromValue,
    {
        let value = fields.next().ok_or(MaskError::Reconstruct {
            type_name,
            field,
            source: ValueError::MissingField,
        })?;
        T::from_value(value).map_err(|source| MaskError::Reconstruct {
            type_name,
            field,
            source,
        })
    }

    pub fn downcast_object<T>(value: Value, expected: &'static str) -> Result<T, ValueError>
    where
        T: Clone + 'static,
    {
        match value {
            Value::Object(object) => object
                .as_any()
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| ValueError::ObjectType {
                    expected,
                    found: object.type_name(),
                }),
            other => Err(ValueError::Mismatch {
                expected: "object",
                found: other.kind(),
            }),
        }
    }
}
