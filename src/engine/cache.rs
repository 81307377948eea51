//! Resolution cache with TTL expiry and single-flight builds
//!
//! Memoizes resolved [`RoleView`]s per role name. Each cache slot moves
//! through `Empty -> Building -> Ready`; once the TTL elapses a Ready slot
//! is treated exactly like an empty one and triggers a rebuild. While a
//! build is in flight every caller for that key awaits the same shared
//! future, so one provider fetch serves all of them. A failed build is
//! never stored: the error goes to every current waiter and the next call
//! starts over.

use crate::error::Result;
use crate::role::RoleView;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Key namespace; cache keys are `"<namespace>:<role>"`
    pub namespace: String,

    /// Time-to-live for resolved views, measured from store time
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "RBAC".to_string(),
            ttl: Duration::from_secs(60),
        }
    }
}

/// Shared handle to an in-flight view build
type BuildFuture = Shared<BoxFuture<'static, Result<Arc<RoleView>>>>;

/// Per-key cache slot
enum Slot {
    /// Resolved view, valid until `expires_at`
    Ready {
        view: Arc<RoleView>,
        expires_at: Instant,
    },
    /// Build in flight, joined by every concurrent caller
    Building(BuildFuture),
}

/// What an occupied slot yields under the shard lock
enum Lookup {
    Fresh(Arc<RoleView>),
    InFlight(BuildFuture),
    Expired,
}

/// TTL-bounded, single-flight memoization of resolved role views
///
/// The slot map is the engine's only shared mutable state; views are
/// immutable once built and replaced, never mutated, on rebuild. Expired
/// entries are evicted lazily on access; there is no sweeper task.
#[derive(Clone)]
pub struct ResolutionCache {
    entries: Arc<DashMap<String, Slot>>,
    stats: Arc<DashMap<&'static str, usize>>,
    config: CacheConfig,
}

impl ResolutionCache {
    /// Create a cache with the given configuration
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            stats: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Resolve the cached view for `role_name`, building it if absent,
    /// expired, or joining the build already in flight
    ///
    /// `build` is only invoked when this call actually starts a build.
    /// The caller-supplied context never participates in the key: the
    /// cached view is context-independent.
    pub async fn get_or_build<F, Fut>(&self, role_name: &str, build: F) -> Result<Arc<RoleView>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RoleView>> + Send + 'static,
    {
        let key = self.cache_key(role_name);

        let build_future = match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let lookup = match occupied.get() {
                    Slot::Ready { view, expires_at } if Instant::now() < *expires_at => {
                        Lookup::Fresh(Arc::clone(view))
                    }
                    Slot::Ready { .. } => Lookup::Expired,
                    Slot::Building(in_flight) => Lookup::InFlight(in_flight.clone()),
                };
                match lookup {
                    Lookup::Fresh(view) => {
                        bump(&self.stats, "hits");
                        return Ok(view);
                    }
                    Lookup::InFlight(in_flight) => {
                        bump(&self.stats, "joins");
                        debug!(key = key.as_str(), "joining in-flight build");
                        in_flight
                    }
                    Lookup::Expired => {
                        bump(&self.stats, "expirations");
                        debug!(key = key.as_str(), "entry expired, rebuilding");
                        let fresh = self.start_build(key, build());
                        occupied.insert(Slot::Building(fresh.clone()));
                        fresh
                    }
                }
            }
            Entry::Vacant(vacant) => {
                bump(&self.stats, "misses");
                debug!(key = key.as_str(), "cache miss, building");
                let fresh = self.start_build(key, build());
                vacant.insert(Slot::Building(fresh.clone()));
                fresh
            }
        };

        build_future.await
    }

    /// Drop the cached entry for one role
    pub fn invalidate(&self, role_name: &str) {
        self.entries.remove(&self.cache_key(role_name));
    }

    /// Drop every cached entry and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    /// Current cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stat("hits"),
            misses: self.stat("misses"),
            joins: self.stat("joins"),
            expirations: self.stat("expirations"),
            entries: self.entries.len(),
        }
    }

    fn cache_key(&self, role_name: &str) -> String {
        format!("{}:{}", self.config.namespace, role_name)
    }

    /// Wrap a build so that its completion transitions the slot itself:
    /// Ready on success, removed on failure. The transition runs inside
    /// the shared future, so it happens regardless of which waiter (or
    /// how many) is still polling.
    fn start_build<Fut>(&self, key: String, build: Fut) -> BuildFuture
    where
        Fut: Future<Output = Result<RoleView>> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        let ttl = self.config.ttl;

        async move {
            match build.await {
                Ok(view) => {
                    let view = Arc::new(view);
                    let expires_at = Instant::now() + ttl;
                    entries.insert(
                        key,
                        Slot::Ready {
                            view: Arc::clone(&view),
                            expires_at,
                        },
                    );
                    Ok(view)
                }
                Err(err) => {
                    entries.remove(&key);
                    debug!(error = %err, "view build failed, entry dropped");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

fn bump(stats: &DashMap<&'static str, usize>, key: &'static str) {
    stats.entry(key).and_modify(|count| *count += 1).or_insert(1);
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Calls that joined a build already in flight
    pub joins: usize,
    pub expirations: usize,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from a Ready entry
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.joins + self.expirations;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
