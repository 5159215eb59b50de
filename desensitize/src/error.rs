//! Error types for setup and masking.
//!
//! Setup-time problems (bad signatures, unknown cascade types, ambiguous
//! resolver priorities) surface as [`ConfigError`] when the engine or a
//! descriptor is built. Masking-time problems surface as [`MaskError`] and are
//! always propagated to the caller; the engine never falls back to returning
//! the unmasked value.

use thiserror::Error;

use crate::{strategy::StrategyId, value::ValueKind};

/// Failure raised by a single masking strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The strategy only understands some value kinds.
    #[error("strategy cannot mask a {found} value")]
    UnsupportedValue { found: ValueKind },

    /// Strategy-specific failure.
    #[error("{0}")]
    Custom(String),
}

impl StrategyError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Failure converting a [`Value`](crate::Value) back into a Rust type.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("expected object of type `{expected}`, found `{found}`")]
    ObjectType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing field value")]
    MissingField,
}

/// Failure while masking a value.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("strategy `{id}` failed")]
    Strategy {
        id: StrategyId,
        #[source]
        source: StrategyError,
    },

    #[error("cannot rebuild `{type_name}`: field `{field}`")]
    Reconstruct {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: ValueError,
    },

    #[error("declared type `{declared}` does not match runtime type `{found}`")]
    TypeMismatch { declared: String, found: String },

    #[error("no cascade binding for type `{0}`")]
    UnknownCascadeType(String),

    /// Strategies ended up on a container or cascaded position, usually by
    /// substituting a generic argument. Nothing is returned unmasked.
    #[error("strategies on `{0}` do not reach a scalar position")]
    MisplacedStrategies(String),

    #[error("resolver failed: {0}")]
    Resolver(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("masked value cannot be converted back")]
    Convert(#[source] ValueError),
}

impl MaskError {
    /// Wraps an arbitrary resolver failure.
    pub fn resolver<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Resolver(error.into())
    }
}

/// Setup-time configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid type signature `{signature}`: {message}")]
    Signature { signature: String, message: String },

    #[error("type `{0}` is declared cascaded but has no cascade binding")]
    UnknownCascadeType(String),

    #[error("cascade type `{0}` registered twice")]
    DuplicateCascadeType(String),

    #[error("strategy `{0}` registered twice")]
    DuplicateStrategy(StrategyId),

    #[error("resolver priority {0} is already taken")]
    DuplicatePriority(i64),

    #[error("`{raw}` takes {expected} type argument(s), found {found}")]
    Arity {
        raw: String,
        expected: usize,
        found: usize,
    },

    #[error("field `{type_name}.{field}`")]
    Field {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: Box<ConfigError>,
    },

    #[cfg(feature = "json")]
    #[error("invalid configuration")]
    Json(#[from] serde_json::Error),
}
