//! Resolution of [`TypeMetadata`] into [`Shape`] descriptors.

use super::{
    descriptor::Shape,
    metadata::{Annotation, TypeMetadata, simple_name},
};
use crate::{error::ConfigError, strategy::StrategyId};

/// Number of type parameters of well-known generic declarations.
fn known_arity(name: &str) -> Option<usize> {
    match simple_name(name) {
        "List" | "Set" | "Collection" => Some(1),
        "Map" => Some(2),
        _ => None,
    }
}

fn split_annotations(annotations: &[Annotation]) -> (Vec<StrategyId>, bool) {
    let mut ids = Vec::new();
    let mut cascade = false;
    for annotation in annotations {
        match annotation {
            Annotation::Strategy(id) => ids.push(id.clone()),
            Annotation::Cascade => cascade = true,
        }
    }
    (ids, cascade)
}

fn check_arity(name: &str, expected: usize, found: usize) -> Result<(), ConfigError> {
    if found == expected {
        Ok(())
    } else {
        Err(ConfigError::Arity {
            raw: name.to_owned(),
            expected,
            found,
        })
    }
}

/// Builds the descriptor for `metadata`.
///
/// `cascade_params` returns the number of type parameters of a type with a
/// cascade binding, or `None` when the type has no binding.
pub(crate) fn build_shape<F>(metadata: &TypeMetadata, cascade_params: &F) -> Result<Shape, ConfigError>
where
    F: Fn(&str) -> Option<usize>,
{
    let build_all = |items: &[TypeMetadata]| {
        items
            .iter()
            .map(|item| build_shape(item, cascade_params))
            .collect::<Result<Vec<_>, _>>()
    };

    let (ids, cascade) = split_annotations(metadata.annotations());
    let shape = match metadata {
        TypeMetadata::Class {
            name, arguments, ..
        } if cascade => {
            let params =
                cascade_params(name).ok_or_else(|| ConfigError::UnknownCascadeType(name.clone()))?;
            // A cascaded type without arguments is used raw.
            if !arguments.is_empty() {
                check_arity(name, params, arguments.len())?;
            }
            Shape::cascaded(name.clone(), build_all(arguments)?)
        }
        TypeMetadata::Class {
            name, arguments, ..
        } => {
            if arguments.is_empty() {
                Shape::scalar(name.clone())
            } else {
                if let Some(expected) = known_arity(name) {
                    check_arity(name, expected, arguments.len())?;
                }
                Shape::parameterized(name.clone(), build_all(arguments)?)
            }
        }
        _ if cascade => {
            return Err(ConfigError::Signature {
                signature: metadata.to_string(),
                message: "@Cascade applies to class types only".to_owned(),
            });
        }
        TypeMetadata::Array { component, .. } => {
            Shape::array(build_shape(component, cascade_params)?)
        }
        TypeMetadata::Variable { name, bounds, .. } => {
            Shape::type_variable(name.clone(), build_all(bounds)?)
        }
        TypeMetadata::Wildcard { upper, lower, .. } => {
            let bounds = if upper.is_empty() { lower } else { upper };
            Shape::wildcard(build_all(bounds)?)
        }
    };

    if ids.is_empty() {
        return Ok(shape);
    }
    if !shape.accepts_strategies() {
        return Err(ConfigError::Signature {
            signature: metadata.to_string(),
            message: "strategies apply to scalar positions; annotate the element or value type"
                .to_owned(),
        });
    }
    Ok(shape.with_annotations(ids))
}
