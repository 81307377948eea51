//! RBAC service facade
//!
//! [`RbacService`] wires the role provider, filter registry, and
//! resolution cache together and is the host-facing entry point:
//! `get_role` yields a [`RoleHandle`] binding a cached [`RoleView`] to the
//! caller's [`FilterContext`], and `can` answers permission checks against
//! it.

pub mod cache;

pub use cache::{CacheConfig, CacheStats, ResolutionCache};

use crate::error::Result;
use crate::filters::{FilterPermission, FilterRegistry};
use crate::provider::RoleProvider;
use crate::role::{PermissionResolver, RoleStore, RoleView};
use crate::types::FilterContext;
use futures::future;
use std::sync::Arc;
use tracing::{debug, info};

/// RBAC resolution engine facade
///
/// Process-wide per configured instance; cheap to clone, clones share the
/// cache. Assembled through [`RbacService::builder`] with explicit
/// registration tables, with no runtime discovery.
#[derive(Clone)]
pub struct RbacService {
    provider: Arc<dyn RoleProvider>,
    resolver: PermissionResolver,
    cache: ResolutionCache,
}

impl RbacService {
    /// Start building a service over a role provider
    pub fn builder(provider: Arc<dyn RoleProvider>) -> RbacServiceBuilder {
        RbacServiceBuilder {
            provider,
            filters: FilterRegistry::new(),
            cache_config: CacheConfig::default(),
        }
    }

    /// Resolve a role with an empty filter context
    pub async fn get_role(&self, name: &str) -> Result<RoleHandle> {
        self.get_role_with_context(name, FilterContext::new()).await
    }

    /// Resolve a role, binding the given context to the returned handle
    ///
    /// The view comes from the resolution cache; on a miss the provider is
    /// fetched and the role closure rebuilt. The context is bound to the
    /// handle only; it never reaches the cache or the build.
    pub async fn get_role_with_context(
        &self,
        name: &str,
        context: FilterContext,
    ) -> Result<RoleHandle> {
        let provider = Arc::clone(&self.provider);
        let role = name.to_string();

        let view = self
            .cache
            .get_or_build(name, move || async move {
                debug!(role = role.as_str(), "building role view");
                let definitions = provider.fetch_roles().await?;
                let store = RoleStore::from_definitions(definitions)?;
                RoleView::build(&store, &role)
            })
            .await?;

        Ok(RoleHandle {
            view,
            context,
            resolver: self.resolver.clone(),
        })
    }

    /// Drop every cached role view
    pub fn invalidate_cache(&self) {
        self.cache.clear();
        info!("resolution cache invalidated");
    }

    /// Resolution cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Builder assembling the service's registration tables
pub struct RbacServiceBuilder {
    provider: Arc<dyn RoleProvider>,
    filters: FilterRegistry,
    cache_config: CacheConfig,
}

impl RbacServiceBuilder {
    /// Supply a pre-built filter registry
    pub fn filters(mut self, registry: FilterRegistry) -> Self {
        self.filters = registry;
        self
    }

    /// Register a single async filter
    pub fn filter(mut self, key: impl Into<String>, filter: Arc<dyn FilterPermission>) -> Self {
        self.filters = self.filters.register(key, filter);
        self
    }

    /// Register a single synchronous predicate
    pub fn filter_fn<F>(mut self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FilterContext) -> bool + Send + Sync + 'static,
    {
        self.filters = self.filters.register_fn(key, predicate);
        self
    }

    /// Configure the resolution cache
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Assemble the service
    pub fn build(self) -> RbacService {
        info!(
            namespace = self.cache_config.namespace.as_str(),
            ttl_ms = self.cache_config.ttl.as_millis() as u64,
            filters = self.filters.len(),
            "RbacService initialized"
        );

        RbacService {
            provider: self.provider,
            resolver: PermissionResolver::new(Arc::new(self.filters)),
            cache: ResolutionCache::new(self.cache_config),
        }
    }
}

/// Lightweight handle binding a resolved role view to a caller context
pub struct RoleHandle {
    view: Arc<RoleView>,
    context: FilterContext,
    resolver: PermissionResolver,
}

impl std::fmt::Debug for RoleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleHandle")
            .field("view", &self.view)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl RoleHandle {
    /// Check permission tokens against the role
    ///
    /// Every token is evaluated independently (concurrently, in no
    /// guaranteed order) and the results are ANDed. Zero tokens is the
    /// vacuous AND and returns `Ok(true)`.
    pub async fn can(&self, tokens: &[&str]) -> Result<bool> {
        let checks = tokens
            .iter()
            .map(|token| self.resolver.check(&self.view, token, &self.context));
        let results = future::try_join_all(checks).await?;
        Ok(results.into_iter().all(|granted| granted))
    }

    /// The resolved view backing this handle
    pub fn view(&self) -> &RoleView {
        &self.view
    }

    /// The context bound at `get_role` time
    pub fn context(&self) -> &FilterContext {
        &self.context
    }
}
