//! Text masking policies for string-like values.
//!
//! This module provides [`TextMaskingPolicy`] and its configuration types.
//! Policies are pure string transformations; they do not traverse structures
//! or decide whether a value is sensitive.

use std::borrow::Cow;

/// Default placeholder used for full replacement.
pub const FULL_PLACEHOLDER: &str = "******";

/// Default character used to mask sensitive characters.
pub const MASK_CHAR: char = '*';

/// Configuration that keeps selected segments visible while masking the remainder.
///
/// The policy operates on Unicode scalar values. If the configuration keeps the
/// entire value visible, the output is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    /// Number of leading characters to keep visible.
    visible_prefix: usize,
    /// Number of trailing characters to keep visible.
    visible_suffix: usize,
    /// Symbol used to mask the middle.
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the first `visible_prefix` scalar values.
    #[must_use]
    pub fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    /// Keeps only the last `visible_suffix` scalar values.
    #[must_use]
    pub fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    /// Keeps both leading and trailing characters visible.
    ///
    /// If `visible_prefix + visible_suffix >= total_length`, the entire value
    /// is kept visible (no masking occurs).
    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: MASK_CHAR,
        }
    }

    /// Masks every character.
    #[must_use]
    pub fn none() -> Self {
        Self::both(0, 0)
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    pub(crate) fn set_mask_char(&mut self, mask_char: char) {
        self.mask_char = mask_char;
    }

    pub(crate) fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();

        if self.visible_prefix.saturating_add(self.visible_suffix) >= total {
            return value.to_owned();
        }

        for ch in &mut chars[self.visible_prefix..(total - self.visible_suffix)] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// Configuration that masks selected segments while leaving the remainder unchanged.
///
/// Masking operates on Unicode scalar values and bounds the masked spans for
/// short inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct MaskConfig {
    /// Number of leading characters to mask.
    mask_prefix: usize,
    /// Number of trailing characters to mask.
    mask_suffix: usize,
    mask_char: char,
}

impl MaskConfig {
    #[must_use]
    pub fn first(mask_prefix: usize) -> Self {
        Self::both(mask_prefix, 0)
    }

    #[must_use]
    pub fn last(mask_suffix: usize) -> Self {
        Self::both(0, mask_suffix)
    }

    /// Masks both leading and trailing characters.
    ///
    /// If `mask_prefix + mask_suffix >= total_length`, the entire value
    /// is masked.
    #[must_use]
    pub fn both(mask_prefix: usize, mask_suffix: usize) -> Self {
        Self {
            mask_prefix,
            mask_suffix,
            mask_char: MASK_CHAR,
        }
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    pub(crate) fn set_mask_char(&mut self, mask_char: char) {
        self.mask_char = mask_char;
    }

    pub(crate) fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();

        if self.mask_prefix.saturating_add(self.mask_suffix) >= total {
            chars.fill(self.mask_char);
            return chars.into_iter().collect();
        }

        for ch in &mut chars[..self.mask_prefix] {
            *ch = self.mask_char;
        }
        for ch in &mut chars[total - self.mask_suffix..] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// Configuration for email address masking.
///
/// Masks the local part (before `@`) while preserving the domain. If no `@` is
/// present, the input is masked like a prefix-keep policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmailConfig {
    /// Number of leading characters of the local part to keep visible.
    visible_prefix: usize,
    mask_char: char,
}

impl EmailConfig {
    #[must_use]
    pub fn new(visible_prefix: usize) -> Self {
        Self {
            visible_prefix,
            mask_char: MASK_CHAR,
        }
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    pub(crate) fn set_mask_char(&mut self, mask_char: char) {
        self.mask_char = mask_char;
    }

    pub(crate) fn apply_to(&self, value: &str) -> String {
        let Some(at_pos) = value.find('@') else {
            return KeepConfig::first(self.visible_prefix)
                .with_mask_char(self.mask_char)
                .apply_to(value);
        };

        let local = &value[..at_pos];
        let domain = &value[at_pos..]; // includes the @
        let local_len = local.chars().count();
        if self.visible_prefix >= local_len {
            return value.to_owned();
        }

        let visible: String = local.chars().take(self.visible_prefix).collect();
        let masked: String =
            std::iter::repeat_n(self.mask_char, local_len - self.visible_prefix).collect();
        format!("{visible}{masked}{domain}")
    }
}

/// A masking strategy for string-like values.
///
/// All variants operate on Unicode scalar values and return an owned `String`.
/// Empty input stays empty: there is nothing to hide and masking never
/// fabricates data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextMaskingPolicy {
    /// Replace the entire value with a fixed placeholder.
    Full { placeholder: Cow<'static, str> },
    /// Keep configured segments visible while masking everything else.
    Keep(KeepConfig),
    /// Mask configured segments while leaving the remainder untouched.
    Mask(MaskConfig),
    /// Mask the local part of an email address, preserving the domain.
    Email(EmailConfig),
}

impl TextMaskingPolicy {
    /// [`TextMaskingPolicy::Full`] using [`FULL_PLACEHOLDER`].
    #[must_use]
    pub fn default_full() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(FULL_PLACEHOLDER),
        }
    }

    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    #[must_use]
    pub fn keep_with(config: KeepConfig) -> Self {
        Self::Keep(config)
    }

    #[must_use]
    pub fn keep_first(visible_prefix: usize) -> Self {
        Self::keep_with(KeepConfig::first(visible_prefix))
    }

    #[must_use]
    pub fn keep_last(visible_suffix: usize) -> Self {
        Self::keep_with(KeepConfig::last(visible_suffix))
    }

    /// Keeps `visible_prefix` leading and `visible_suffix` trailing characters.
    #[must_use]
    pub fn keep_both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self::keep_with(KeepConfig::both(visible_prefix, visible_suffix))
    }

    #[must_use]
    pub fn mask_with(config: MaskConfig) -> Self {
        Self::Mask(config)
    }

    #[must_use]
    pub fn mask_first(mask_prefix: usize) -> Self {
        Self::mask_with(MaskConfig::first(mask_prefix))
    }

    #[must_use]
    pub fn mask_last(mask_suffix: usize) -> Self {
        Self::mask_with(MaskConfig::last(mask_suffix))
    }

    /// Keeps the first `visible_prefix` chars of the local part and the domain.
    ///
    /// ```
    /// use desensitize::TextMaskingPolicy;
    ///
    /// let policy = TextMaskingPolicy::email_local(1);
    /// assert_eq!(policy.apply_to("123456@qq.com"), "1*****@qq.com");
    /// ```
    #[must_use]
    pub fn email_local(visible_prefix: usize) -> Self {
        Self::Email(EmailConfig::new(visible_prefix))
    }

    /// Overrides the masking character used by keep/mask/email policies.
    ///
    /// Has no effect on [`TextMaskingPolicy::Full`].
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        match &mut self {
            TextMaskingPolicy::Full { .. } => {}
            TextMaskingPolicy::Keep(config) => config.set_mask_char(mask_char),
            TextMaskingPolicy::Mask(config) => config.set_mask_char(mask_char),
            TextMaskingPolicy::Email(config) => config.set_mask_char(mask_char),
        }
        self
    }

    /// Applies the policy to `value`. Total: never fails.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self {
            TextMaskingPolicy::Full { placeholder } => placeholder.clone().into_owned(),
            TextMaskingPolicy::Keep(config) => config.apply_to(value),
            TextMaskingPolicy::Mask(config) => config.apply_to(value),
            TextMaskingPolicy::Email(config) => config.apply_to(value),
        }
    }
}

impl Default for TextMaskingPolicy {
    fn default() -> Self {
        Self::default_full()
    }
}

#[cfg(test)]
mod tests {
    use super::{FULL_PLACEHOLDER, KeepConfig, MaskConfig, TextMaskingPolicy};

    #[test]
    fn keep_policy_allows_full_visibility() {
        let policy = TextMaskingPolicy::keep_with(KeepConfig::first(3));
        assert_eq!(policy.apply_to("ab"), "ab");
    }

    #[test]
    fn keep_policy_respects_mask_char() {
        let policy = TextMaskingPolicy::keep_first(2).with_mask_char('#');
        assert_eq!(policy.apply_to("abcdef"), "ab####");
    }

    #[test]
    fn keep_both_masks_the_middle() {
        let policy = TextMaskingPolicy::keep_both(3, 4);
        assert_eq!(policy.apply_to("12345678910"), "123****8910");
    }

    #[test]
    fn keep_none_masks_everything() {
        let policy = TextMaskingPolicy::keep_with(KeepConfig::none());
        assert_eq!(policy.apply_to("hunter2"), "*******");
    }

    #[test]
    fn full_policy_uses_placeholders() {
        assert_eq!(
            TextMaskingPolicy::default_full().apply_to("secret"),
            FULL_PLACEHOLDER
        );
        assert_eq!(
            TextMaskingPolicy::full_with("<masked>").apply_to("secret"),
            "<masked>"
        );
    }

    #[test]
    fn mask_policy_masks_first_and_last_segments() {
        assert_eq!(TextMaskingPolicy::mask_first(2).apply_to("abcdef"), "**cdef");
        assert_eq!(TextMaskingPolicy::mask_last(3).apply_to("abcdef"), "abc***");
    }

    #[test]
    fn mask_both_overlap_masks_entire_value() {
        let policy = TextMaskingPolicy::mask_with(MaskConfig::both(2, 2));
        assert_eq!(policy.apply_to("abc"), "***");
        assert_eq!(policy.apply_to("abcdef"), "**cd**");

        let policy = TextMaskingPolicy::mask_with(MaskConfig::both(usize::MAX, usize::MAX));
        assert_eq!(policy.apply_to("abcd"), "****");
    }

    #[test]
    fn keep_both_overlap_keeps_entire_value() {
        let policy = TextMaskingPolicy::keep_both(2, 2);
        assert_eq!(policy.apply_to("abcd"), "abcd");

        let policy = TextMaskingPolicy::keep_both(usize::MAX, usize::MAX);
        assert_eq!(policy.apply_to("abcd"), "abcd");
    }

    #[test]
    fn email_policy_preserves_domain() {
        let policy = TextMaskingPolicy::email_local(1);
        assert_eq!(policy.apply_to("123456@qq.com"), "1*****@qq.com");
        assert_eq!(policy.apply_to("x@a.com"), "x@a.com");
    }

    #[test]
    fn email_policy_masks_non_email_inputs() {
        let policy = TextMaskingPolicy::email_local(2);
        assert_eq!(policy.apply_to("noatsymbol"), "no********");
        assert_eq!(policy.apply_to("ab@x.com"), "ab@x.com");
    }

    #[test]
    fn email_policy_counts_multibyte_local_part() {
        let policy = TextMaskingPolicy::email_local(1).with_mask_char('#');
        assert_eq!(policy.apply_to("张三丰@example.cn"), "张##@example.cn");
    }

    #[test]
    fn empty_input_stays_empty() {
        for policy in [
            TextMaskingPolicy::keep_first(4),
            TextMaskingPolicy::mask_first(4),
            TextMaskingPolicy::email_local(2),
            TextMaskingPolicy::default_full(),
        ] {
            assert_eq!(policy.apply_to(""), "");
        }
    }

    #[test]
    fn full_policy_ignores_mask_char() {
        let policy = TextMaskingPolicy::default_full().with_mask_char('#');
        assert_eq!(policy, TextMaskingPolicy::default_full());
    }
}
