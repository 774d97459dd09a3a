//! Namespace scopes and the getter/commit/dispatch handles bound to them.
//!
//! The store keeps one [`Scope`] per distinct namespace. Every module in that
//! namespace, namespaced or merged, shares the scope's handles, and with them
//! one identity.

use super::StoreInner;
use crate::dispatch::{CallOptions, Committer, Dispatcher, GetterSource, Pending};
use crate::error::StoreError;
use crate::identity::{Identity, IdentityKey};
use serde_json::Value;
use std::sync::Arc;

/// A dispatch-key namespace (`""` at the root, `"a/b/"` below).
#[derive(Debug)]
pub struct Scope {
    namespace: String,
    identity: Identity,
}

impl Scope {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identity: Identity::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Full dispatch key for `key` issued from this scope.
    pub fn qualify(&self, key: &str, options: CallOptions) -> String {
        if options.root || self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}{}", self.namespace, key)
        }
    }
}

/// Getter source, committer and dispatcher for one scope.
#[derive(Clone)]
pub struct ScopeHandle {
    store: Arc<StoreInner>,
    scope: Arc<Scope>,
}

impl ScopeHandle {
    pub(crate) fn new(store: Arc<StoreInner>, scope: Arc<Scope>) -> Self {
        Self { store, scope }
    }

    pub fn namespace(&self) -> &str {
        self.scope.namespace()
    }
}

impl GetterSource for ScopeHandle {
    fn identity(&self) -> Option<IdentityKey> {
        Some(self.scope.identity().key())
    }

    fn get(&self, key: &str) -> Result<Value, StoreError> {
        let full = self.scope.qualify(key, CallOptions::default());
        StoreInner::getter(&self.store, &full)
    }
}

impl Committer for ScopeHandle {
    fn identity(&self) -> Option<IdentityKey> {
        Some(self.scope.identity().key())
    }

    fn commit(&self, key: &str, payload: Value, options: CallOptions) -> Result<(), StoreError> {
        let full = self.scope.qualify(key, options);
        self.store.commit(&full, payload)
    }
}

impl Dispatcher for ScopeHandle {
    fn identity(&self) -> Option<IdentityKey> {
        Some(self.scope.identity().key())
    }

    fn dispatch(&self, key: &str, payload: Value, options: CallOptions) -> Pending {
        let full = self.scope.qualify(key, options);
        StoreInner::dispatch(&self.store, &full, payload)
    }
}
