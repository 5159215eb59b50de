//! The strategy catalog: identifier → masking function.
//!
//! The catalog is filled while the engine is being built and is read-only
//! afterwards, so lookups during traversal need no locking.

use std::{borrow::Borrow, borrow::Cow, collections::HashMap, fmt, sync::Arc};

use super::{
    builtin::{ChineseName, Email, IdCardNumber, Password, PhoneNumber, StrategyMarker},
    text::TextMaskingPolicy,
};
use crate::{
    error::{ConfigError, MaskError, StrategyError},
    value::Value,
};

/// Identifier of a masking strategy, as written in annotations.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrategyId(Cow<'static, str>);

impl StrategyId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Identifier of a marker type.
    pub const fn of<M: StrategyMarker>() -> Self {
        Self::from_static(M::ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StrategyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for StrategyId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for StrategyId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

/// A pure masking function.
///
/// Implementations must not mutate shared state; the same strategy instance
/// is invoked concurrently from any number of threads.
pub trait MaskingStrategy: Send + Sync {
    fn mask(&self, value: &Value) -> Result<Value, StrategyError>;
}

impl<F> MaskingStrategy for F
where
    F: Fn(&Value) -> Result<Value, StrategyError> + Send + Sync,
{
    fn mask(&self, value: &Value) -> Result<Value, StrategyError> {
        self(value)
    }
}

impl MaskingStrategy for TextMaskingPolicy {
    fn mask(&self, value: &Value) -> Result<Value, StrategyError> {
        match value {
            Value::Text(text) => Ok(Value::text(self.apply_to(text))),
            Value::Null => Ok(Value::Null),
            other => Err(StrategyError::UnsupportedValue {
                found: other.kind(),
            }),
        }
    }
}

/// Mapping from [`StrategyId`] to [`MaskingStrategy`].
#[derive(Clone, Default)]
pub struct StrategyCatalog {
    strategies: HashMap<StrategyId, Arc<dyn MaskingStrategy>>,
}

impl StrategyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in marker.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.put_marker::<Email>();
        catalog.put_marker::<PhoneNumber>();
        catalog.put_marker::<ChineseName>();
        catalog.put_marker::<IdCardNumber>();
        catalog.put_marker::<Password>();
        catalog
    }

    fn put_marker<M: StrategyMarker>(&mut self) {
        self.strategies
            .insert(StrategyId::of::<M>(), Arc::new(M::policy()));
    }

    /// Registers a strategy under a fresh identifier.
    pub fn insert<S>(&mut self, id: impl Into<StrategyId>, strategy: S) -> Result<(), ConfigError>
    where
        S: MaskingStrategy + 'static,
    {
        self.insert_arc(id.into(), Arc::new(strategy))
    }

    /// Registers a marker type's default policy.
    pub fn insert_marker<M: StrategyMarker>(&mut self) -> Result<(), ConfigError> {
        self.insert(StrategyId::of::<M>(), M::policy())
    }

    pub(crate) fn insert_arc(
        &mut self,
        id: StrategyId,
        strategy: Arc<dyn MaskingStrategy>,
    ) -> Result<(), ConfigError> {
        if self.strategies.contains_key(&id) {
            return Err(ConfigError::DuplicateStrategy(id));
        }
        tracing::debug!(strategy = %id, "registered masking strategy");
        self.strategies.insert(id, strategy);
        Ok(())
    }

    /// Registers a strategy, replacing any previous one with the same identifier.
    pub fn replace<S>(
        &mut self,
        id: impl Into<StrategyId>,
        strategy: S,
    ) -> Option<Arc<dyn MaskingStrategy>>
    where
        S: MaskingStrategy + 'static,
    {
        self.replace_arc(id.into(), Arc::new(strategy))
    }

    pub(crate) fn replace_arc(
        &mut self,
        id: StrategyId,
        strategy: Arc<dyn MaskingStrategy>,
    ) -> Option<Arc<dyn MaskingStrategy>> {
        tracing::debug!(strategy = %id, "replaced masking strategy");
        self.strategies.insert(id, strategy)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn MaskingStrategy>> {
        self.strategies.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.strategies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Applies `annotations` to `value` in declaration order, so `[A, B]`
    /// yields `B(A(value))`.
    ///
    /// Identifiers missing from the catalog are skipped.
    pub fn apply(&self, annotations: &[StrategyId], value: &Value) -> Result<Value, MaskError> {
        let mut current = value.clone();
        for id in annotations {
            let Some(strategy) = self.get(id.as_str()) else {
                tracing::trace!(strategy = %id, "skipping unregistered strategy");
                continue;
            };
            current = strategy
                .mask(&current)
                .map_err(|source| MaskError::Strategy {
                    id: id.clone(),
                    source,
                })?;
        }
        Ok(current)
    }
}

impl fmt::Debug for StrategyCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.strategies.keys().map(StrategyId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("StrategyCatalog").field("strategies", &ids).finish()
    }
}
