//! Type-directed traversal.
//!
//! The walker pairs a runtime [`Value`] with its [`Shape`] and rebuilds only
//! the positions the shape marks as needing masking. Everything else is
//! handed back by reference, so a value whose shape carries no annotations
//! comes back as the very same allocation.

use std::sync::Arc;

use crate::{
    cascade::Reconstruct,
    engine::Desensitizer,
    error::{MaskError, ValueError},
    shape::{Shape, ShapeKind},
    value::Value,
};

impl Desensitizer {
    /// Masks `value` against its declared `shape`.
    ///
    /// The input is never modified. Positions that need no masking are shared
    /// with the result; changed positions get fresh containers and objects.
    /// The first strategy or resolver failure aborts the pass.
    pub fn mask(&self, value: &Value, shape: &Shape) -> Result<Value, MaskError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if let Some(resolver) = self.resolvers.first_match(value, shape) {
            tracing::trace!(shape = %shape, "resolver claimed position");
            return resolver.resolve(value, shape, self);
        }

        if !shape.needs_masking() {
            return Ok(value.clone());
        }
        if !shape.annotations().is_empty() && !shape.accepts_strategies() {
            return Err(MaskError::MisplacedStrategies(shape.to_string()));
        }

        match shape.kind() {
            ShapeKind::Scalar { .. } => self.strategies.apply(shape.annotations(), value),
            ShapeKind::Array => match shape.children() {
                [component] => self.mask_elements(value, component),
                _ => Ok(value.clone()),
            },
            ShapeKind::Parameterized { raw } => self.mask_parameterized(value, shape, raw),
            ShapeKind::TypeVariable { .. } | ShapeKind::Wildcard => match shape.children().first() {
                Some(bound) => {
                    let bound = bound.with_leading(shape.annotations(), shape.cascade_requested());
                    self.mask(value, &bound)
                }
                None => self.strategies.apply(shape.annotations(), value),
            },
            ShapeKind::Cascaded { type_name } => self.mask_object(value, shape, type_name),
        }
    }

    fn mask_parameterized(&self, value: &Value, shape: &Shape, raw: &str) -> Result<Value, MaskError> {
        match (value, shape.children()) {
            (Value::Array(_) | Value::List(_) | Value::Set(_), [element]) => {
                self.mask_elements(value, element)
            }
            (Value::Map(entries), [key_shape, value_shape]) => {
                self.mask_entries(value, entries, key_shape, value_shape)
            }
            _ => {
                tracing::trace!(
                    raw,
                    kind = %value.kind(),
                    "passing through unhandled generic value"
                );
                Ok(value.clone())
            }
        }
    }

    /// Masks every element of an array, list or set, keeping the container
    /// kind. Other values pass through.
    fn mask_elements(&self, value: &Value, element: &Shape) -> Result<Value, MaskError> {
        let Some(items) = value.as_elements() else {
            return Ok(value.clone());
        };
        if !element.needs_masking() {
            return Ok(value.clone());
        }

        let mut changed = false;
        let mut masked = Vec::with_capacity(items.len());
        for item in items {
            let next = self.mask(item, element)?;
            changed |= !next.ptr_eq(item);
            masked.push(next);
        }
        if !changed {
            return Ok(value.clone());
        }

        Ok(match value {
            Value::Set(_) => Value::set(masked),
            Value::List(_) => Value::list(masked),
            _ => Value::array(masked),
        })
    }

    fn mask_entries(
        &self,
        value: &Value,
        entries: &Arc<[(Value, Value)]>,
        key_shape: &Shape,
        value_shape: &Shape,
    ) -> Result<Value, MaskError> {
        let mut changed = false;
        let mut masked = Vec::with_capacity(entries.len());
        for (key, item) in entries.iter() {
            let next_key = self.mask(key, key_shape)?;
            let next_item = self.mask(item, value_shape)?;
            changed |= !next_key.ptr_eq(key) || !next_item.ptr_eq(item);
            masked.push((next_key, next_item));
        }
        if !changed {
            return Ok(value.clone());
        }
        Ok(Value::map(masked))
    }

    fn mask_object(&self, value: &Value, shape: &Shape, type_name: &str) -> Result<Value, MaskError> {
        let Some(object) = value.as_object() else {
            return Ok(value.clone());
        };
        let binding = self
            .cascades
            .get(type_name)
            .ok_or_else(|| MaskError::UnknownCascadeType(type_name.to_owned()))?;
        if object.type_name() != binding.type_name() {
            return Err(MaskError::TypeMismatch {
                declared: type_name.to_owned(),
                found: object.type_name().to_owned(),
            });
        }
        if !binding.needs_masking() {
            return Ok(value.clone());
        }

        let values = object.field_values();
        if values.len() < binding.fields().len() {
            let field = binding
                .fields()
                .get(values.len())
                .map_or("?", |(name, _)| *name);
            return Err(MaskError::Reconstruct {
                type_name: binding.type_name(),
                field,
                source: ValueError::MissingField,
            });
        }

        let mut changed = false;
        let mut masked = Vec::with_capacity(values.len());
        for (index, field_value) in values.iter().enumerate() {
            let Some((_, field_shape)) = binding.fields().get(index) else {
                masked.push(field_value.clone());
                continue;
            };
            let field_shape = field_shape.substitute(binding.type_params(), shape.children());
            let next = if field_shape.needs_masking() {
                self.mask(field_value, &field_shape)?
            } else {
                field_value.clone()
            };
            changed |= !next.ptr_eq(field_value);
            masked.push(next);
        }
        if !changed {
            return Ok(value.clone());
        }
        rebuild(object, masked)
    }
}

fn rebuild(object: &dyn Reconstruct, fields: Vec<Value>) -> Result<Value, MaskError> {
    let rebuilt = object.rebuild(fields)?;
    tracing::trace!(type_name = object.type_name(), "rebuilt cascaded object");
    Ok(rebuilt)
}
