//! Per-call contexts handed to action and getter implementations.
//!
//! Each action call and each getter evaluation gets a fresh context with a
//! fresh identity. Clones of one context share that identity.

use super::scope::ScopeHandle;
use super::{ModuleInfo, StoreInner};
use crate::dispatch::{
    CallOptions, Committer, Dispatcher, GetterSource, Pending, RawContext, RawGetterContext,
    StateSource,
};
use crate::error::StoreError;
use crate::identity::{Identity, IdentityKey};
use crate::tree::ModulePath;
use serde_json::Value;
use std::sync::Arc;

/// Live state view for one module.
pub struct ModuleStateView {
    store: Arc<StoreInner>,
    module: Arc<ModuleInfo>,
}

impl StateSource for ModuleStateView {
    fn state(&self) -> Value {
        self.store.module_state(&self.module)
    }

    fn root_state(&self) -> Value {
        self.store.root_state()
    }
}

#[derive(Clone)]
struct Binding {
    store: Arc<StoreInner>,
    module: Arc<ModuleInfo>,
    identity: Identity,
}

impl Binding {
    fn new(store: Arc<StoreInner>, module: Arc<ModuleInfo>) -> Self {
        Self {
            store,
            module,
            identity: Identity::new(),
        }
    }

    fn local(&self) -> ScopeHandle {
        ScopeHandle::new(Arc::clone(&self.store), Arc::clone(&self.module.scope))
    }

    fn root(&self) -> ScopeHandle {
        StoreInner::root_handle(&self.store)
    }

    fn states(&self) -> Arc<dyn StateSource> {
        Arc::new(ModuleStateView {
            store: Arc::clone(&self.store),
            module: Arc::clone(&self.module),
        })
    }
}

/// Context of one action call: local and root state, getters, commit and
/// dispatch. Local calls are resolved inside the module's namespace.
#[derive(Clone)]
pub struct ActionContext {
    binding: Binding,
}

impl ActionContext {
    pub(crate) fn new(store: Arc<StoreInner>, module: Arc<ModuleInfo>) -> Self {
        Self {
            binding: Binding::new(store, module),
        }
    }

    pub fn module_path(&self) -> &ModulePath {
        &self.binding.module.path
    }

    pub fn namespace(&self) -> &str {
        self.binding.module.scope.namespace()
    }

    pub fn state(&self) -> Value {
        self.binding.store.module_state(&self.binding.module)
    }

    pub fn root_state(&self) -> Value {
        self.binding.store.root_state()
    }

    /// Local getter by name.
    pub fn getter(&self, name: &str) -> Result<Value, StoreError> {
        self.binding.local().get(name)
    }

    /// Root getter by full dispatch key.
    pub fn root_getter(&self, key: &str) -> Result<Value, StoreError> {
        self.binding.root().get(key)
    }

    pub fn commit(&self, key: &str, payload: Value) -> Result<(), StoreError> {
        self.commit_with(key, payload, CallOptions::default())
    }

    pub fn commit_with(&self, key: &str, payload: Value, options: CallOptions) -> Result<(), StoreError> {
        self.binding.local().commit(key, payload, options)
    }

    pub fn dispatch(&self, key: &str, payload: Value) -> Pending {
        self.dispatch_with(key, payload, CallOptions::default())
    }

    pub fn dispatch_with(&self, key: &str, payload: Value, options: CallOptions) -> Pending {
        self.binding.local().dispatch(key, payload, options)
    }
}

impl RawGetterContext for ActionContext {
    fn identity(&self) -> Option<IdentityKey> {
        Some(self.binding.identity.key())
    }

    fn states(&self) -> Arc<dyn StateSource> {
        self.binding.states()
    }

    fn getters(&self) -> Arc<dyn GetterSource> {
        Arc::new(self.binding.local())
    }

    fn root_getters(&self) -> Arc<dyn GetterSource> {
        Arc::new(self.binding.root())
    }
}

impl RawContext for ActionContext {
    fn committer(&self) -> Arc<dyn Committer> {
        Arc::new(self.binding.local())
    }

    fn dispatcher(&self) -> Arc<dyn Dispatcher> {
        Arc::new(self.binding.local())
    }
}

/// Context of one getter evaluation: `(state, getters, root_state, root_getters)`.
#[derive(Clone)]
pub struct GetterContext {
    binding: Binding,
}

impl GetterContext {
    pub(crate) fn new(store: Arc<StoreInner>, module: Arc<ModuleInfo>) -> Self {
        Self {
            binding: Binding::new(store, module),
        }
    }

    pub fn module_path(&self) -> &ModulePath {
        &self.binding.module.path
    }

    pub fn state(&self) -> Value {
        self.binding.store.module_state(&self.binding.module)
    }

    pub fn root_state(&self) -> Value {
        self.binding.store.root_state()
    }

    /// Local getter by name.
    pub fn getter(&self, name: &str) -> Result<Value, StoreError> {
        self.binding.local().get(name)
    }

    /// Root getter by full dispatch key.
    pub fn root_getter(&self, key: &str) -> Result<Value, StoreError> {
        self.binding.root().get(key)
    }
}

impl RawGetterContext for GetterContext {
    fn identity(&self) -> Option<IdentityKey> {
        Some(self.binding.identity.key())
    }

    fn states(&self) -> Arc<dyn StateSource> {
        self.binding.states()
    }

    fn getters(&self) -> Arc<dyn GetterSource> {
        Arc::new(self.binding.local())
    }

    fn root_getters(&self) -> Arc<dyn GetterSource> {
        Arc::new(self.binding.root())
    }
}
