//! Ordered, copy-on-write resolver storage.

use std::{
    fmt,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicI64, AtomicU64, Ordering},
    },
};

use super::Resolver;
use crate::{error::ConfigError, shape::Shape, value::Value};

/// First priority handed out by [`Priority::Auto`].
///
/// Automatic priorities are large, so explicitly prioritized resolvers with
/// small values run first.
pub const AUTO_PRIORITY_BASE: i64 = 1 << 40;

static NEXT_AUTO_PRIORITY: AtomicI64 = AtomicI64::new(AUTO_PRIORITY_BASE);

/// Resolver ordering. Lower values are consulted first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    Explicit(i64),
    /// Next value of a process-wide counter, so automatic priorities never
    /// collide and follow registration order.
    Auto,
}

impl Priority {
    fn assign(self) -> i64 {
        match self {
            Priority::Explicit(priority) => priority,
            Priority::Auto => NEXT_AUTO_PRIORITY.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl From<i64> for Priority {
    fn from(priority: i64) -> Self {
        Priority::Explicit(priority)
    }
}

#[derive(Clone)]
struct ResolverEntry {
    priority: i64,
    sequence: u64,
    resolver: Arc<dyn Resolver>,
}

/// Resolvers sorted by priority.
///
/// Readers take a snapshot of the current slice; registration publishes a
/// new sorted slice, so a traversal in progress never observes a partial
/// update.
pub struct ResolverRegistry {
    entries: RwLock<Arc<[ResolverEntry]>>,
    sequence: AtomicU64,
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Arc::from(Vec::new())),
            sequence: AtomicU64::new(0),
        }
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Arc<[ResolverEntry]> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Adds a resolver and returns the priority it was assigned.
    ///
    /// Two resolvers with the same priority would make precedence ambiguous,
    /// so a taken priority is rejected.
    pub fn register<R>(&self, resolver: R, priority: Priority) -> Result<i64, ConfigError>
    where
        R: Resolver + 'static,
    {
        self.register_arc(Arc::new(resolver), priority)
    }

    pub fn register_arc(
        &self,
        resolver: Arc<dyn Resolver>,
        priority: Priority,
    ) -> Result<i64, ConfigError> {
        let priority = priority.assign();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|entry| entry.priority == priority) {
            return Err(ConfigError::DuplicatePriority(priority));
        }

        let mut next: Vec<ResolverEntry> = entries.iter().cloned().collect();
        next.push(ResolverEntry {
            priority,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            resolver,
        });
        next.sort_by_key(|entry| (entry.priority, entry.sequence));
        *entries = next.into();

        tracing::debug!(priority, resolvers = entries.len(), "registered resolver");
        Ok(priority)
    }

    /// The highest-precedence resolver supporting this position, if any.
    pub fn first_match(&self, value: &Value, shape: &Shape) -> Option<Arc<dyn Resolver>> {
        self.snapshot()
            .iter()
            .find(|entry| entry.resolver.supports(value, shape))
            .map(|entry| Arc::clone(&entry.resolver))
    }

    /// Assigned priorities in consultation order.
    pub fn priorities(&self) -> Vec<i64> {
        self.snapshot().iter().map(|entry| entry.priority).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("priorities", &self.priorities())
            .finish()
    }
}
