//! Identity-keyed context cache.
//!
//! Maps the identity of an underlying dispatcher, getter source or per-call
//! context (plus the module position it was requested for) to the facade or
//! context built from it. At most one value is kept per key; repeated
//! requests get the same `Arc`.
//!
//! Entries hold only a weak view of their key's identity. When every owner of
//! that identity is gone the entry is dead and [`ContextCache::sweep`] drops
//! it. Sweeps run automatically every `sweep_interval` inserts; owners that
//! tear down deterministically can also call [`ContextCache::invalidate`].

use crate::identity::IdentityKey;
use crate::tree::ModulePath;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Context cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache built facades and contexts (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Sweep dead entries after this many inserts; 0 disables automatic sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: usize,
}

fn default_true() -> bool {
    true
}

fn default_sweep_interval() -> usize {
    64
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

/// Cache key: an underlying object's identity and the module position the
/// value was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identity: IdentityKey,
    pub scope: ModulePath,
}

impl CacheKey {
    pub fn new(identity: IdentityKey, scope: ModulePath) -> Self {
        Self { identity, scope }
    }

    pub fn root(identity: IdentityKey) -> Self {
        Self::new(identity, ModulePath::root())
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Create-if-absent cache of `Arc<T>` by [`CacheKey`].
pub struct ContextCache<T> {
    name: &'static str,
    config: CacheConfig,
    entries: Mutex<HashMap<CacheKey, Arc<T>>>,
    inserts_since_sweep: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T> ContextCache<T> {
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self {
            name,
            config,
            entries: Mutex::new(HashMap::new()),
            inserts_since_sweep: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the value stored for `key`, or build and store it.
    ///
    /// A `None` key (no identity) or a disabled cache builds a fresh value on
    /// every call and stores nothing. The lock is released while `factory`
    /// runs, so the factory may itself use this cache; if another build for
    /// the same key lands first, that value is returned and this one dropped.
    pub fn get_or_create<E, F>(&self, key: Option<CacheKey>, factory: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let key = match key {
            Some(key) if self.config.enabled => key,
            _ => {
                trace!(cache = self.name, "Building uncached value");
                return factory().map(Arc::new);
            }
        };

        if let Some(existing) = self.entries.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(existing));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let built = Arc::new(factory()?);

        let value = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.clone()).or_insert(built))
        };
        trace!(cache = self.name, identity = key.identity.id(), scope = %key.scope, "Cached value");

        self.maybe_sweep();
        Ok(value)
    }

    /// Stored value for `key`, if any. Does not count as a hit.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<T>> {
        self.entries.lock().get(key).cloned()
    }

    /// Drop every entry whose identity has no owner left. Returns the number
    /// of entries removed.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| key.identity.is_alive());
        let removed = before - entries.len();
        if removed > 0 {
            debug!(cache = self.name, removed, remaining = entries.len(), "Swept dead entries");
        }
        removed
    }

    /// Drop every entry for `identity`, whatever its scope.
    pub fn invalidate(&self, identity: &IdentityKey) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| &key.identity != identity);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.inserts_since_sweep.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn maybe_sweep(&self) {
        let interval = self.config.sweep_interval;
        if interval == 0 {
            return;
        }
        let inserts = self.inserts_since_sweep.fetch_add(1, Ordering::Relaxed) + 1;
        if inserts >= interval {
            self.inserts_since_sweep.store(0, Ordering::Relaxed);
            self.sweep();
        }
    }
}

/// Maintenance operations shared by every [`ContextCache`], whatever it
/// stores.
pub trait CacheControl {
    fn name(&self) -> &'static str;

    fn sweep(&self) -> usize;

    fn clear(&self);

    fn stats(&self) -> CacheStats;
}

impl<T> CacheControl for ContextCache<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sweep(&self) -> usize {
        ContextCache::sweep(self)
    }

    fn clear(&self) {
        ContextCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        ContextCache::stats(self)
    }
}
