//! The masking engine and its builder.
//!
//! A [`Desensitizer`] owns everything traversal needs: the strategy catalog,
//! the resolved cascade bindings and the resolver registry. The catalog and
//! bindings are fixed by [`DesensitizerBuilder::build`]; resolvers can still
//! be added later through [`Desensitizer::register_resolver`].
//!
//! ```rust
//! use desensitize::{Desensitizer, TypeMetadata, Value};
//!
//! let engine = Desensitizer::builder().build().unwrap();
//! let shape = engine.descriptor("List<@Email String>").unwrap();
//!
//! let emails = Value::list([Value::text("123456@qq.com"), Value::text("a@b.com")]);
//! let masked = engine.mask(&emails, &shape).unwrap();
//! assert_eq!(masked.to_string(), r#"["1*****@qq.com", "a@b.com"]"#);
//! ```

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    cascade::{Cascade, CascadeBinding, CascadeRegistry},
    error::{ConfigError, MaskError},
    resolver::{Priority, Resolver, ResolverRegistry, ResponseResolver},
    shape::{Describe, Shape, TypeMetadata, build_shape},
    strategy::{MaskingStrategy, StrategyCatalog, StrategyId, StrategyMarker},
    value::{FromValue, IntoValue},
};

/// Type-directed masking engine.
///
/// `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct Desensitizer {
    pub(crate) strategies: StrategyCatalog,
    pub(crate) cascades: BTreeMap<&'static str, Arc<CascadeBinding>>,
    pub(crate) resolvers: ResolverRegistry,
}

impl Desensitizer {
    pub fn builder() -> DesensitizerBuilder {
        DesensitizerBuilder::new()
    }

    /// Resolves declared-type metadata into a descriptor.
    ///
    /// Fails when a cascaded position names a type without a cascade binding,
    /// or when a generic declaration gets the wrong number of arguments.
    /// Descriptors are immutable; build them once per declared type and reuse
    /// them.
    pub fn build_descriptor(&self, metadata: &TypeMetadata) -> Result<Shape, ConfigError> {
        build_shape(metadata, &|name: &str| {
            self.cascades
                .get(name)
                .map(|binding| binding.type_params().len())
        })
    }

    /// Parses `signature` and resolves it into a descriptor.
    pub fn descriptor(&self, signature: &str) -> Result<Shape, ConfigError> {
        self.build_descriptor(&TypeMetadata::parse(signature)?)
    }

    /// Descriptor of a Rust type's declared metadata.
    pub fn describe<T: Describe>(&self) -> Result<Shape, ConfigError> {
        self.build_descriptor(&T::type_metadata())
    }

    /// Masks a Rust value and converts the result back to its type.
    pub fn mask_as<T>(&self, value: T, shape: &Shape) -> Result<T, MaskError>
    where
        T: IntoValue + FromValue,
    {
        let masked = self.mask(&value.into_value(), shape)?;
        T::from_value(masked).map_err(MaskError::Convert)
    }

    /// Adds a resolver after construction and returns its assigned priority.
    pub fn register_resolver<R>(&self, resolver: R, priority: Priority) -> Result<i64, ConfigError>
    where
        R: Resolver + 'static,
    {
        self.resolvers.register(resolver, priority)
    }

    pub fn strategies(&self) -> &StrategyCatalog {
        &self.strategies
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    pub fn cascade_binding(&self, type_name: &str) -> Option<&CascadeBinding> {
        self.cascades.get(type_name).map(AsRef::as_ref)
    }
}

struct StrategyRegistration {
    id: StrategyId,
    strategy: Arc<dyn MaskingStrategy>,
    replace: bool,
}

/// Builder for [`Desensitizer`].
///
/// Registration errors are kept until [`build`](Self::build), which reports
/// the first one.
pub struct DesensitizerBuilder {
    builtins: bool,
    response_envelope: bool,
    strategies: Vec<StrategyRegistration>,
    cascades: CascadeRegistry,
    resolvers: Vec<(Arc<dyn Resolver>, Priority)>,
    error: Option<ConfigError>,
}

impl Default for DesensitizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DesensitizerBuilder {
    pub fn new() -> Self {
        Self {
            builtins: true,
            response_envelope: true,
            strategies: Vec::new(),
            cascades: CascadeRegistry::new(),
            resolvers: Vec::new(),
            error: None,
        }
    }

    fn record(&mut self, result: Result<(), ConfigError>) {
        if let Err(error) = result {
            self.error.get_or_insert(error);
        }
    }

    /// Skips the built-in strategies (`Email`, `PhoneNumber`, ...).
    #[must_use]
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Skips the [`ResponseResolver`].
    #[must_use]
    pub fn without_response_envelope(mut self) -> Self {
        self.response_envelope = false;
        self
    }

    /// Registers a strategy. Reusing an identifier is an error.
    #[must_use]
    pub fn strategy<S>(mut self, id: impl Into<StrategyId>, strategy: S) -> Self
    where
        S: MaskingStrategy + 'static,
    {
        self.strategies.push(StrategyRegistration {
            id: id.into(),
            strategy: Arc::new(strategy),
            replace: false,
        });
        self
    }

    /// Registers a strategy, replacing a built-in or earlier registration
    /// with the same identifier.
    #[must_use]
    pub fn replace_strategy<S>(mut self, id: impl Into<StrategyId>, strategy: S) -> Self
    where
        S: MaskingStrategy + 'static,
    {
        self.strategies.push(StrategyRegistration {
            id: id.into(),
            strategy: Arc::new(strategy),
            replace: true,
        });
        self
    }

    /// Registers a marker type's default policy under its identifier.
    #[must_use]
    pub fn marker<M: StrategyMarker>(self) -> Self {
        self.strategy(StrategyId::of::<M>(), M::policy())
    }

    /// Registers a cascade type.
    #[must_use]
    pub fn cascade<T: Cascade>(mut self) -> Self {
        let result = self.cascades.register::<T>();
        self.record(result);
        self
    }

    #[must_use]
    pub fn resolver<R>(mut self, resolver: R, priority: impl Into<Priority>) -> Self
    where
        R: Resolver + 'static,
    {
        self.resolvers.push((Arc::new(resolver), priority.into()));
        self
    }

    /// Applies a declarative configuration. Its strategies replace any
    /// existing ones with the same identifier. Its switches can only turn
    /// built-ins and the response envelope off, never back on.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn config(mut self, config: crate::config::DesensitizeConfig) -> Self {
        self.builtins &= config.builtins;
        self.response_envelope &= config.response_envelope;
        for (id, strategy) in &config.strategies {
            self = self.replace_strategy(id.clone(), strategy.to_policy());
        }
        self
    }

    pub fn build(self) -> Result<Desensitizer, ConfigError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut strategies = if self.builtins {
            StrategyCatalog::with_builtins()
        } else {
            StrategyCatalog::new()
        };
        for registration in self.strategies {
            if registration.replace {
                strategies.replace_arc(registration.id, registration.strategy);
            } else {
                strategies.insert_arc(registration.id, registration.strategy)?;
            }
        }

        let cascades = self.cascades.resolve()?;

        let resolvers = ResolverRegistry::new();
        for (resolver, priority) in self.resolvers {
            resolvers.register_arc(resolver, priority)?;
        }
        if self.response_envelope {
            resolvers.register(ResponseResolver, Priority::Auto)?;
        }

        tracing::debug!(
            strategies = strategies.len(),
            cascade_types = cascades.len(),
            resolvers = resolvers.len(),
            "built desensitizer"
        );
        Ok(Desensitizer {
            strategies,
            cascades,
            resolvers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::StrategyError,
        strategy::{Email, TextMaskingPolicy},
        value::Value,
    };

    fn upper(value: &Value) -> Result<Value, StrategyError> {
        Ok(Value::text(value.as_text().unwrap_or_default().to_uppercase()))
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Desensitizer>();
    }

    #[test]
    fn defaults_include_builtins_and_response_resolver() {
        let engine = Desensitizer::builder().build().unwrap();
        assert!(engine.strategies().contains(Email::ID));
        assert_eq!(engine.resolvers().len(), 1);
    }

    #[test]
    fn builtins_and_envelope_can_be_disabled() {
        let engine = Desensitizer::builder()
            .without_builtins()
            .without_response_envelope()
            .build()
            .unwrap();
        assert!(engine.strategies().is_empty());
        assert!(engine.resolvers().is_empty());
    }

    #[test]
    fn duplicate_strategy_fails_build() {
        let err = Desensitizer::builder()
            .strategy("Upper", upper)
            .strategy("Upper", upper)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStrategy(id) if id.as_str() == "Upper"));

        let err = Desensitizer::builder().marker::<Email>().build().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStrategy(_)));
    }

    #[test]
    fn replace_strategy_overrides_builtin() {
        let engine = Desensitizer::builder()
            .replace_strategy(Email::ID, TextMaskingPolicy::default_full())
            .build()
            .unwrap();
        let shape = engine.descriptor("@Email String").unwrap();
        let masked = engine.mask(&Value::text("a@b.c"), &shape).unwrap();
        assert_eq!(masked, Value::text("******"));
    }

    #[test]
    fn descriptor_requires_cascade_binding() {
        let engine = Desensitizer::builder().build().unwrap();
        let err = engine.descriptor("@Cascade Person").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCascadeType(name) if name == "Person"));
    }

    #[test]
    fn describe_uses_type_metadata() {
        let engine = Desensitizer::builder().build().unwrap();
        let shape = engine.describe::<Vec<String>>().unwrap();
        assert_eq!(shape.to_string(), "List<String>");
        assert!(!shape.needs_masking());
    }

    #[test]
    fn mask_as_round_trips_rust_values() {
        let engine = Desensitizer::builder().build().unwrap();
        let shape = engine.descriptor("List<@PhoneNumber String>").unwrap();
        let masked = engine
            .mask_as(vec!["12345678910".to_owned()], &shape)
            .unwrap();
        assert_eq!(masked, vec!["123****8910".to_owned()]);
    }

    #[test]
    fn mask_as_reports_conversion_failure() {
        let engine = Desensitizer::builder()
            .strategy("Length", |value: &Value| -> Result<Value, StrategyError> {
                Ok(Value::Int(
                    i64::try_from(value.as_text().map_or(0, str::len)).unwrap_or(i64::MAX),
                ))
            })
            .build()
            .unwrap();
        let shape = engine.descriptor("@Length String").unwrap();
        let err = engine.mask_as("abc".to_owned(), &shape).unwrap_err();
        assert!(matches!(err, MaskError::Convert(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn config_replaces_strategies_and_switches() {
        let config = crate::config::DesensitizeConfig::from_json_str(
            r#"{
                "response_envelope": false,
                "strategies": { "Email": { "kind": "full", "placeholder": "<email>" } }
            }"#,
        )
        .unwrap();
        let engine = Desensitizer::builder().config(config).build().unwrap();
        assert!(engine.resolvers().is_empty());

        let shape = engine.descriptor("@Email String").unwrap();
        let masked = engine.mask(&Value::text("a@b.c"), &shape).unwrap();
        assert_eq!(masked, Value::text("<email>"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn config_does_not_re_enable_switches() {
        let config = crate::config::DesensitizeConfig::from_json_str("{}").unwrap();
        assert!(config.builtins && config.response_envelope);

        let engine = Desensitizer::builder()
            .without_builtins()
            .without_response_envelope()
            .config(config)
            .build()
            .unwrap();
        assert!(engine.strategies().is_empty());
        assert!(engine.resolvers().is_empty());
    }
}
