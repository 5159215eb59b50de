//! Pluggable resolvers.
//!
//! A resolver takes over masking for positions the built-in handling does not
//! understand, typically a generic wrapper whose payload must be masked
//! against a type argument. Resolvers are consulted before built-in handling,
//! in priority order, and the first one that supports a position handles it
//! alone.

mod registry;
mod response;

pub use registry::{AUTO_PRIORITY_BASE, Priority, ResolverRegistry};
pub use response::{Response, ResponseResolver};

use crate::{engine::Desensitizer, error::MaskError, shape::Shape, value::Value};

/// Custom handling for a family of values.
///
/// `supports` should inspect both the runtime value and the descriptor.
/// `resolve` typically recurses into [`Desensitizer::mask`] for the parts of
/// the value it unwraps, and must not mutate the input.
///
/// ```rust
/// use desensitize::{Desensitizer, MaskError, Resolver, Shape, Value};
///
/// /// Masks the first element of a two-element list against the first
/// /// type argument.
/// struct PairResolver;
///
/// impl Resolver for PairResolver {
///     fn supports(&self, value: &Value, shape: &Shape) -> bool {
///         matches!(value.as_elements(), Some(items) if items.len() == 2)
///             && shape.children().len() == 2
///     }
///
///     fn resolve(
///         &self,
///         value: &Value,
///         shape: &Shape,
///         engine: &Desensitizer,
///     ) -> Result<Value, MaskError> {
///         let items = value.as_elements().unwrap_or_default();
///         let first = engine.mask(&items[0], &shape.children()[0])?;
///         Ok(Value::list([first, items[1].clone()]))
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    fn supports(&self, value: &Value, shape: &Shape) -> bool;

    fn resolve(&self, value: &Value, shape: &Shape, engine: &Desensitizer)
    -> Result<Value, MaskError>;
}
