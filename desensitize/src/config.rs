//! Declarative engine configuration.
//!
//! ```rust
//! use desensitize::{Desensitizer, config::DesensitizeConfig};
//!
//! let config = DesensitizeConfig::from_json_str(
//!     r#"{
//!         "strategies": {
//!             "BankCard": { "kind": "keep", "first": 6, "last": 4 },
//!             "Token": { "kind": "full", "placeholder": "[hidden]" }
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! let engine = Desensitizer::builder().config(config).build().unwrap();
//! assert!(engine.strategies().contains("BankCard"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    strategy::{EmailConfig, KeepConfig, MaskConfig, TextMaskingPolicy},
};

/// Engine configuration loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesensitizeConfig {
    /// Register the built-in strategies.
    #[serde(default = "default_true")]
    pub builtins: bool,
    /// Register the response envelope resolver.
    #[serde(default = "default_true")]
    pub response_envelope: bool,
    /// Text strategies by identifier. These replace built-ins with the same
    /// identifier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub strategies: BTreeMap<String, TextStrategyConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for DesensitizeConfig {
    fn default() -> Self {
        Self {
            builtins: true,
            response_envelope: true,
            strategies: BTreeMap::new(),
        }
    }
}

impl DesensitizeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A text masking policy in configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TextStrategyConfig {
    /// Keep `first` leading and `last` trailing characters visible.
    Keep {
        #[serde(default)]
        first: usize,
        #[serde(default)]
        last: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mask_char: Option<char>,
    },
    /// Mask `first` leading and `last` trailing characters.
    Mask {
        #[serde(default)]
        first: usize,
        #[serde(default)]
        last: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mask_char: Option<char>,
    },
    /// Keep `visible_prefix` characters of the local part and the domain.
    Email {
        #[serde(default = "default_visible_prefix")]
        visible_prefix: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mask_char: Option<char>,
    },
    /// Replace the whole value.
    Full {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

fn default_visible_prefix() -> usize {
    1
}

impl TextStrategyConfig {
    pub fn to_policy(&self) -> TextMaskingPolicy {
        let policy = match self {
            TextStrategyConfig::Keep { first, last, .. } => {
                TextMaskingPolicy::keep_with(KeepConfig::both(*first, *last))
            }
            TextStrategyConfig::Mask { first, last, .. } => {
                TextMaskingPolicy::mask_with(MaskConfig::both(*first, *last))
            }
            TextStrategyConfig::Email { visible_prefix, .. } => {
                TextMaskingPolicy::Email(EmailConfig::new(*visible_prefix))
            }
            TextStrategyConfig::Full { placeholder } => placeholder
                .clone()
                .map_or_else(TextMaskingPolicy::default_full, TextMaskingPolicy::full_with),
        };
        match self {
            TextStrategyConfig::Keep {
                mask_char: Some(mask_char),
                ..
            }
            | TextStrategyConfig::Mask {
                mask_char: Some(mask_char),
                ..
            }
            | TextStrategyConfig::Email {
                mask_char: Some(mask_char),
                ..
            } => policy.with_mask_char(*mask_char),
            _ => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = DesensitizeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DesensitizeConfig::default());
    }

    #[test]
    fn strategies_become_policies() {
        let config = DesensitizeConfig::from_json_str(
            r##"{
                "response_envelope": false,
                "strategies": {
                    "BankCard": { "kind": "keep", "first": 6, "last": 4, "mask_char": "#" },
                    "Suffix": { "kind": "mask", "last": 3 },
                    "Email": { "kind": "email", "visible_prefix": 2 },
                    "Token": { "kind": "full" }
                }
            }"##,
        )
        .unwrap();
        assert!(!config.response_envelope);
        assert!(config.builtins);

        let apply = |id: &str, input: &str| config.strategies[id].to_policy().apply_to(input);
        assert_eq!(apply("BankCard", "6222021234567890"), "622202######7890");
        assert_eq!(apply("Suffix", "abcdef"), "abc***");
        assert_eq!(apply("Email", "123456@qq.com"), "12****@qq.com");
        assert_eq!(apply("Token", "secret"), "******");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = DesensitizeConfig::from_json_str(
            r#"{ "strategies": { "X": { "kind": "scramble" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
