//! Built-in strategy markers.
//!
//! Each marker is a zero-sized type naming one strategy identifier and its
//! default text policy. Markers double as the attribute vocabulary of
//! `#[derive(Cascade)]`: `#[sensitive(Email)]` resolves to `Email::ID`, so a
//! misspelled marker is a compile error rather than a silent no-op.
//!
//! # Custom markers
//!
//! ```rust
//! use desensitize::{StrategyMarker, TextMaskingPolicy};
//!
//! struct StaffId;
//!
//! impl StrategyMarker for StaffId {
//!     const ID: &'static str = "StaffId";
//!
//!     fn policy() -> TextMaskingPolicy {
//!         TextMaskingPolicy::keep_last(2)
//!     }
//! }
//! ```

use super::text::{KeepConfig, TextMaskingPolicy};

/// Associates a marker type with a strategy identifier and text policy.
pub trait StrategyMarker {
    /// Identifier under which the strategy is registered in the catalog.
    const ID: &'static str;

    /// Returns the policy for this marker type.
    fn policy() -> TextMaskingPolicy;
}

/// Email addresses: keeps the first character of the local part and the
/// whole domain (`"123456@qq.com"` → `"1*****@qq.com"`).
#[derive(Clone, Copy, Debug)]
pub struct Email;

impl StrategyMarker for Email {
    const ID: &'static str = "Email";

    fn policy() -> TextMaskingPolicy {
        TextMaskingPolicy::email_local(1)
    }
}

/// Mobile phone numbers: keeps the first 3 and last 4 digits
/// (`"12345678910"` → `"123****8910"`).
#[derive(Clone, Copy, Debug)]
pub struct PhoneNumber;

impl StrategyMarker for PhoneNumber {
    const ID: &'static str = "PhoneNumber";

    fn policy() -> TextMaskingPolicy {
        TextMaskingPolicy::keep_both(3, 4)
    }
}

/// Chinese personal names: keeps the family name (`"诸葛亮"` → `"诸**"`).
#[derive(Clone, Copy, Debug)]
pub struct ChineseName;

impl StrategyMarker for ChineseName {
    const ID: &'static str = "ChineseName";

    fn policy() -> TextMaskingPolicy {
        TextMaskingPolicy::keep_first(1)
    }
}

/// Resident identity card numbers: keeps the 6-digit region code and the
/// last 4 characters.
#[derive(Clone, Copy, Debug)]
pub struct IdCardNumber;

impl StrategyMarker for IdCardNumber {
    const ID: &'static str = "IdCardNumber";

    fn policy() -> TextMaskingPolicy {
        TextMaskingPolicy::keep_both(6, 4)
    }
}

/// Passwords: every character is masked, length is preserved.
#[derive(Clone, Copy, Debug)]
pub struct Password;

impl StrategyMarker for Password {
    const ID: &'static str = "Password";

    fn policy() -> TextMaskingPolicy {
        TextMaskingPolicy::keep_with(KeepConfig::none())
    }
}
