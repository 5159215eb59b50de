//! Masking strategies.
//!
//! - [`text`]: configurable text policies (keep/mask/email/full).
//! - [`builtin`]: marker types naming the built-in strategies.
//! - [`catalog`]: the identifier → strategy lookup table used by the engine.

pub mod builtin;
mod catalog;
pub mod text;

pub use builtin::{ChineseName, Email, IdCardNumber, Password, PhoneNumber, StrategyMarker};
pub use catalog::{MaskingStrategy, StrategyCatalog, StrategyId};
pub use text::{
    EmailConfig, FULL_PLACEHOLDER, KeepConfig, MASK_CHAR, MaskConfig, TextMaskingPolicy,
};
