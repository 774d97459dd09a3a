//! Contract between facades and the underlying dispatch store.
//!
//! Facades only ever talk to a store through these traits. The reference
//! store in [`crate::store`] implements them, and so can any other store, or a
//! test double recording the keys it receives.

use crate::error::StoreError;
use crate::identity::IdentityKey;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Result of dispatching an action: a pending computation resolving to the
/// action's return value. Facades hand it back untouched.
pub type Pending = BoxFuture<'static, Result<Value, StoreError>>;

/// Options accompanying a commit or dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Address the key from the store root, ignoring the caller's namespace.
    pub root: bool,
}

impl CallOptions {
    pub fn root() -> Self {
        Self { root: true }
    }
}

/// Live getter lookup by dispatch key.
pub trait GetterSource: Send + Sync {
    fn identity(&self) -> Option<IdentityKey>;

    fn get(&self, key: &str) -> Result<Value, StoreError>;
}

/// Commit by dispatch key.
pub trait Committer: Send + Sync {
    fn identity(&self) -> Option<IdentityKey>;

    fn commit(&self, key: &str, payload: Value, options: CallOptions) -> Result<(), StoreError>;
}

/// Dispatch by dispatch key.
pub trait Dispatcher: Send + Sync {
    fn identity(&self) -> Option<IdentityKey>;

    fn dispatch(&self, key: &str, payload: Value, options: CallOptions) -> Pending;
}

/// Live read access to module-local and root state.
///
/// Cached contexts hold on to this, so it must not own the identity of the
/// per-call context it came from.
pub trait StateSource: Send + Sync {
    fn state(&self) -> Value;

    fn root_state(&self) -> Value;
}

/// Per-call view handed to a getter implementation.
pub trait RawGetterContext: Send + Sync {
    /// Identity of this per-call context; `None` disables context caching.
    fn identity(&self) -> Option<IdentityKey>;

    fn states(&self) -> Arc<dyn StateSource>;

    fn getters(&self) -> Arc<dyn GetterSource>;

    fn root_getters(&self) -> Arc<dyn GetterSource>;
}

/// Per-call view handed to an action implementation.
pub trait RawContext: RawGetterContext {
    fn committer(&self) -> Arc<dyn Committer>;

    fn dispatcher(&self) -> Arc<dyn Dispatcher>;
}

/// Forces root addressing on every call forwarded to the wrapped
/// committer or dispatcher.
pub struct RootMode<T: ?Sized> {
    inner: Arc<T>,
}

impl<T: ?Sized> RootMode<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl Committer for RootMode<dyn Committer> {
    fn identity(&self) -> Option<IdentityKey> {
        self.inner.identity()
    }

    fn commit(&self, key: &str, payload: Value, _options: CallOptions) -> Result<(), StoreError> {
        self.inner.commit(key, payload, CallOptions::root())
    }
}

impl Dispatcher for RootMode<dyn Dispatcher> {
    fn identity(&self) -> Option<IdentityKey> {
        self.inner.identity()
    }

    fn dispatch(&self, key: &str, payload: Value, _options: CallOptions) -> Pending {
        self.inner.dispatch(key, payload, CallOptions::root())
    }
}
