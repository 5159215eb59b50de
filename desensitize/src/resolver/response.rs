//! Response envelopes.
//!
//! A [`Response`] wraps a payload with a status and headers. Declared as
//! `Response<T>`, only the body carries the type argument, so the built-in
//! handling (which knows nothing about `Response`) would leave it untouched.
//! [`ResponseResolver`] masks the body against `T` and rebuilds the envelope.

use std::any::Any;

use super::Resolver;
use crate::{
    cascade::Reconstruct,
    engine::Desensitizer,
    error::{MaskError, ValueError},
    shape::{Shape, ShapeKind, TypeMetadata},
    value::{FromValue, IntoValue, Value},
};

/// A response envelope: status, headers and a body.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Response {
    pub const TYPE_NAME: &'static str = "Response";

    pub fn new(status: u16, body: impl IntoValue) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into_value(),
        }
    }

    pub fn ok(body: impl IntoValue) -> Self {
        Self::new(200, body)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Declared metadata of `Response<body>`.
    pub fn type_metadata(body: TypeMetadata) -> TypeMetadata {
        TypeMetadata::generic(Self::TYPE_NAME, [body])
    }
}

impl Reconstruct for Response {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["status", "headers", "body"]
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Int(i64::from(self.status)),
            Value::list(self.headers.iter().map(|(name, value)| {
                Value::list([Value::text(name.as_str()), Value::text(value.as_str())])
            })),
            self.body.clone(),
        ]
    }

    fn rebuild(&self, fields: Vec<Value>) -> Result<Value, MaskError> {
        // Status and headers are carried over unchanged.
        let body = fields.into_iter().nth(2).ok_or(MaskError::Reconstruct {
            type_name: Self::TYPE_NAME,
            field: "body",
            source: ValueError::MissingField,
        })?;
        Ok(Value::object(Self {
            status: self.status,
            headers: self.headers.clone(),
            body,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl IntoValue for Response {
    fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl FromValue for Response {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        crate::cascade::__private::downcast_object(value, Self::TYPE_NAME)
    }
}

/// Masks the body of a [`Response`] declared with one type argument.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseResolver;

impl Resolver for ResponseResolver {
    fn supports(&self, value: &Value, shape: &Shape) -> bool {
        value.downcast_ref::<Response>().is_some()
            && matches!(shape.kind(), ShapeKind::Parameterized { .. })
            && shape.children().len() == 1
    }

    fn resolve(
        &self,
        value: &Value,
        shape: &Shape,
        engine: &Desensitizer,
    ) -> Result<Value, MaskError> {
        let (Some(response), [body_shape]) = (value.downcast_ref::<Response>(), shape.children())
        else {
            return Ok(value.clone());
        };
        let body = engine.mask(&response.body, body_shape)?;
        if body.ptr_eq(&response.body) {
            return Ok(value.clone());
        }
        Ok(Value::object(Response {
            status: response.status,
            headers: response.headers.clone(),
            body,
        }))
    }
}
