//! Cascade bindings: declared type name → field shapes.

use std::{collections::BTreeMap, sync::Arc};

use super::{Cascade, FieldMetadata};
use crate::{
    error::ConfigError,
    shape::{Shape, TypeMetadata, build_shape},
};

#[derive(Clone, Debug)]
struct Declaration {
    type_params: &'static [&'static str],
    fields: Vec<(&'static str, TypeMetadata)>,
}

/// Cascade types known to an engine under construction.
///
/// Field shapes may name other cascade types, so they are resolved only when
/// every type is registered (see [`CascadeRegistry::resolve`]).
#[derive(Clone, Debug, Default)]
pub struct CascadeRegistry {
    declarations: BTreeMap<&'static str, Declaration>,
}

impl CascadeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under [`Cascade::TYPE_NAME`].
    ///
    /// Generic types register once; any instantiation declares the same
    /// fields.
    pub fn register<T: Cascade>(&mut self) -> Result<(), ConfigError> {
        self.declare(T::TYPE_NAME, T::type_params(), T::fields())
    }

    fn declare(
        &mut self,
        type_name: &'static str,
        type_params: &'static [&'static str],
        fields: Vec<FieldMetadata>,
    ) -> Result<(), ConfigError> {
        if self.declarations.contains_key(type_name) {
            return Err(ConfigError::DuplicateCascadeType(type_name.to_owned()));
        }
        let fields = fields
            .iter()
            .map(|field| {
                field
                    .type_metadata()
                    .map(|metadata| (field.name(), metadata))
                    .map_err(|source| ConfigError::Field {
                        type_name,
                        field: field.name(),
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            cascade_type = type_name,
            fields = fields.len(),
            "registered cascade type"
        );
        self.declarations.insert(
            type_name,
            Declaration {
                type_params,
                fields,
            },
        );
        Ok(())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.declarations.contains_key(type_name)
    }

    /// Number of type parameters of a registered type.
    pub fn type_param_count(&self, type_name: &str) -> Option<usize> {
        self.declarations
            .get(type_name)
            .map(|declaration| declaration.type_params.len())
    }

    /// Resolves every field shape.
    ///
    /// Fails with [`ConfigError::Field`] when a field names an unregistered
    /// cascade type or has a malformed declaration.
    pub fn resolve(&self) -> Result<BTreeMap<&'static str, Arc<CascadeBinding>>, ConfigError> {
        let params = |name: &str| self.type_param_count(name);
        self.declarations
            .iter()
            .map(|(&type_name, declaration)| {
                let fields = declaration
                    .fields
                    .iter()
                    .map(|(field, metadata)| {
                        build_shape(metadata, &params)
                            .map(|shape| (*field, shape))
                            .map_err(|source| ConfigError::Field {
                                type_name,
                                field: *field,
                                source: Box::new(source),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((
                    type_name,
                    Arc::new(CascadeBinding::new(
                        type_name,
                        declaration.type_params,
                        fields,
                    )),
                ))
            })
            .collect()
    }
}

/// Resolved field shapes of one cascade type.
#[derive(Clone, Debug)]
pub struct CascadeBinding {
    type_name: &'static str,
    type_params: &'static [&'static str],
    fields: Vec<(&'static str, Shape)>,
    needs_masking: bool,
}

impl CascadeBinding {
    fn new(
        type_name: &'static str,
        type_params: &'static [&'static str],
        fields: Vec<(&'static str, Shape)>,
    ) -> Self {
        let needs_masking = fields.iter().any(|(_, shape)| shape.needs_masking())
            || !type_params.is_empty();
        Self {
            type_name,
            type_params,
            fields,
            needs_masking,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_params(&self) -> &'static [&'static str] {
        self.type_params
    }

    /// Field names and resolved shapes in declaration order.
    pub fn fields(&self) -> &[(&'static str, Shape)] {
        &self.fields
    }

    /// `false` when no field can ever need masking, whatever the type
    /// arguments. Generic types are conservatively `true`.
    pub fn needs_masking(&self) -> bool {
        self.needs_masking
    }
}
