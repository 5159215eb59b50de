//! Declared types and their resolved shape descriptors.
//!
//! [`TypeMetadata`] describes a declared type as written (parsed from a
//! signature or produced by [`Describe`]); [`Shape`] is the immutable
//! descriptor the walker consumes.

mod build;
mod describe;
mod descriptor;
mod metadata;
mod signature;

pub(crate) use build::build_shape;
pub use describe::Describe;
pub use descriptor::{Shape, ShapeKind};
pub use metadata::{Annotation, TypeMetadata};
