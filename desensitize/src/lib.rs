//! Type-directed masking of sensitive values.
//!
//! Sensitive data is described by the *declared type* of a value, not by the
//! value itself. A declared type is written once as [`TypeMetadata`] (from a
//! signature string, a [`Describe`] impl or `#[derive(Cascade)]`) and resolved
//! into an immutable [`Shape`]. The [`Desensitizer`] then walks a runtime
//! [`Value`] against that shape:
//!
//! - **Strategies** mask annotated leaves (`@Email String`). They are looked up
//!   by identifier in a [`StrategyCatalog`] and stack in declaration order.
//! - **Containers** (arrays, lists, sets, maps) are rebuilt element-wise.
//! - **Cascaded** objects are walked field by field and rebuilt through the
//!   [`Reconstruct`] capability.
//! - **Resolvers** take over positions the built-in handling does not know,
//!   such as the [`Response`] envelope.
//!
//! Inputs are never mutated, and a value whose shape needs no masking is
//! returned as the same allocation.
//!
//! ```rust
//! use desensitize::{Cascade, Desensitizer, Email, PhoneNumber};
//!
//! #[derive(Clone, Debug, Cascade)]
//! struct Person {
//!     #[sensitive(PhoneNumber)]
//!     phone_number: String,
//!     #[sensitive(Email)]
//!     email: String,
//! }
//!
//! let engine = Desensitizer::builder().cascade::<Person>().build().unwrap();
//! let shape = engine.describe::<Person>().unwrap();
//!
//! let person = Person {
//!     phone_number: "12345678910".into(),
//!     email: "123456@qq.com".into(),
//! };
//! let masked = engine.mask_as(person, &shape).unwrap();
//! assert_eq!(masked.phone_number, "123****8910");
//! assert_eq!(masked.email, "1*****@qq.com");
//! ```
//!
//! What this crate does not do: intercept calls, perform I/O, or serialize
//! values. Callers hand values and descriptors to the engine explicitly.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[cfg(feature = "derive")]
pub use desensitize_derive::Cascade;

#[allow(unused_extern_crates)]
extern crate self as desensitize;

pub mod cascade;
#[cfg(feature = "json")]
pub mod config;
mod engine;
pub mod error;
pub mod resolver;
pub mod shape;
pub mod strategy;
pub mod value;
mod walker;

pub use cascade::{Cascade, CascadeBinding, CascadeRegistry, FieldMetadata, Reconstruct};
pub use engine::{Desensitizer, DesensitizerBuilder};
pub use error::{ConfigError, MaskError, StrategyError, ValueError};
pub use resolver::{Priority, Resolver, ResolverRegistry, Response, ResponseResolver};
pub use shape::{Annotation, Describe, Shape, ShapeKind, TypeMetadata};
pub use strategy::{
    ChineseName, Email, EmailConfig, IdCardNumber, KeepConfig, MaskConfig, MaskingStrategy,
    Password, PhoneNumber, StrategyCatalog, StrategyId, StrategyMarker, TextMaskingPolicy,
};
pub use value::{FromValue, IntoValue, Value, ValueKind};
