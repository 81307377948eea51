//! Conditional permission filters
//!
//! A filter is a named predicate evaluated against the caller-supplied
//! [`FilterContext`]. Both synchronous and asynchronous predicates are
//! normalized to the deferred-boolean [`FilterPermission`] capability at
//! registration time, so the resolver never branches on variant.

use crate::error::Result;
use crate::types::FilterContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Predicate capability gating a conditional grant
#[async_trait]
pub trait FilterPermission: Send + Sync {
    /// Evaluate the predicate against the caller context
    ///
    /// A failing evaluator surfaces as
    /// [`RbacError::FilterEvaluation`](crate::RbacError::FilterEvaluation)
    /// to the `can()` caller; a plain denial is `Ok(false)`.
    async fn evaluate(&self, context: &FilterContext) -> Result<bool>;
}

/// Adapter normalizing a synchronous predicate to the async capability
struct FnFilter<F>(F);

#[async_trait]
impl<F> FilterPermission for FnFilter<F>
where
    F: Fn(&FilterContext) -> bool + Send + Sync,
{
    async fn evaluate(&self, context: &FilterContext) -> Result<bool> {
        Ok((self.0)(context))
    }
}

/// Immutable-after-construction mapping of filter key to predicate
///
/// Built once at wiring time through the consuming `register*` methods;
/// the engine only reads it afterwards. A missing key is an ordinary
/// deny, not an error.
#[derive(Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn FilterPermission>>,
}

impl FilterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async filter implementation under a key
    pub fn register(mut self, key: impl Into<String>, filter: Arc<dyn FilterPermission>) -> Self {
        self.filters.insert(key.into(), filter);
        self
    }

    /// Register a synchronous predicate under a key
    pub fn register_fn<F>(self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FilterContext) -> bool + Send + Sync + 'static,
    {
        self.register(key, Arc::new(FnFilter(predicate)))
    }

    /// Look up a filter by key
    pub fn get(&self, key: &str) -> Option<Arc<dyn FilterPermission>> {
        self.filters.get(key).cloned()
    }

    /// Number of registered filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
