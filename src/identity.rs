//! Surrogate identities for underlying dispatchers, getter sources and
//! per-call contexts.
//!
//! An [`Identity`] is owned by the object it names. Cloning it shares the same
//! handle and the same liveness anchor, so every clone of a context names the
//! same thing. Caches hold an [`IdentityKey`], which keeps only a weak view of
//! the anchor: once every owner is dropped the key reports itself dead and the
//! cache entry can be swept.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Identity handle owned by an underlying object.
#[derive(Clone)]
pub struct Identity {
    id: u64,
    anchor: Arc<()>,
}

impl Identity {
    /// Allocate a fresh, process-unique identity.
    pub fn new() -> Self {
        Self {
            id: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
            anchor: Arc::new(()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Key for cache lookups. Does not extend the owner's lifetime.
    pub fn key(&self) -> IdentityKey {
        IdentityKey {
            id: self.id,
            anchor: Arc::downgrade(&self.anchor),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.id)
    }
}

/// Weak cache key derived from an [`Identity`].
///
/// Equality and hashing use the numeric handle only.
#[derive(Clone)]
pub struct IdentityKey {
    id: u64,
    anchor: Weak<()>,
}

impl IdentityKey {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while at least one owner of the identity is alive.
    pub fn is_alive(&self) -> bool {
        self.anchor.strong_count() > 0
    }
}

impl PartialEq for IdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IdentityKey {}

impl std::hash::Hash for IdentityKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({})", self.id)
    }
}
