//! Reference dispatch store
//!
//! In-memory store built from a [`ModuleOptions`] tree: one state tree, and
//! getters, mutations and actions registered under their dispatch keys.
//! Facades reach it only through the collaborator traits in
//! [`crate::dispatch`].

mod context;
pub mod scope;
pub mod state;

pub use context::{ActionContext, GetterContext, ModuleStateView};
pub use scope::{Scope, ScopeHandle};

use crate::dispatch::{Committer, Dispatcher, GetterSource, Pending};
use crate::error::{OptionsError, StoreError};
use crate::options::{ActionFn, GetterFn, ModuleOptions, MutationFn};
use crate::tree::{dispatch_key, validate, ModulePath, Walker};
use futures::future::{self, FutureExt};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Module a registered handler was declared in.
#[derive(Debug)]
pub(crate) struct ModuleInfo {
    pub(crate) path: ModulePath,
    pub(crate) scope: Arc<Scope>,
}

struct Registered<F> {
    handler: F,
    module: Arc<ModuleInfo>,
}

impl<F: Clone> Registered<F> {
    fn parts(&self) -> (F, Arc<ModuleInfo>) {
        (self.handler.clone(), Arc::clone(&self.module))
    }
}

pub(crate) struct StoreInner {
    options: Arc<ModuleOptions>,
    state: RwLock<Value>,
    getters: HashMap<String, Registered<GetterFn>>,
    mutations: HashMap<String, Registered<MutationFn>>,
    actions: HashMap<String, Registered<ActionFn>>,
    root_scope: Arc<Scope>,
}

impl StoreInner {
    pub(crate) fn getter(this: &Arc<Self>, key: &str) -> Result<Value, StoreError> {
        let (handler, module) = this
            .getters
            .get(key)
            .map(Registered::parts)
            .ok_or_else(|| StoreError::UnknownGetter(key.to_string()))?;

        let context = GetterContext::new(Arc::clone(this), module);
        handler(&context)
    }

    pub(crate) fn commit(&self, key: &str, payload: Value) -> Result<(), StoreError> {
        let registered = self
            .mutations
            .get(key)
            .ok_or_else(|| StoreError::UnknownMutation(key.to_string()))?;

        trace!(key, module = %registered.module.path, "Commit");
        let mut state = self.state.write();
        let target = state::state_at_mut(&mut state, &registered.module.path)?;
        (registered.handler)(target, payload);
        Ok(())
    }

    pub(crate) fn dispatch(this: &Arc<Self>, key: &str, payload: Value) -> Pending {
        let Some((handler, module)) = this.actions.get(key).map(Registered::parts) else {
            return future::ready(Err(StoreError::UnknownAction(key.to_string()))).boxed();
        };

        trace!(key, module = %module.path, "Dispatch");
        handler(ActionContext::new(Arc::clone(this), module), payload)
    }

    pub(crate) fn module_state(&self, module: &ModuleInfo) -> Value {
        let state = self.state.read();
        match state::state_at(&state, &module.path) {
            Ok(value) => value.clone(),
            Err(err) => {
                trace!(error = %err, "Module state missing");
                Value::Null
            }
        }
    }

    pub(crate) fn root_state(&self) -> Value {
        self.state.read().clone()
    }

    pub(crate) fn root_handle(this: &Arc<Self>) -> ScopeHandle {
        ScopeHandle::new(Arc::clone(this), Arc::clone(&this.root_scope))
    }
}

/// In-memory dispatch store.
///
/// Cloning is cheap and shares the same state and registrations.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Build a store from an options tree.
    ///
    /// Registration follows the facade traversal order, so a name declared
    /// twice under one prefix resolves to the same handler here as it does
    /// on the facade.
    pub fn new(options: Arc<ModuleOptions>) -> Result<Self, OptionsError> {
        validate(options.as_ref())?;
        let initial = state::initial_state(&options, &ModulePath::root())?;

        let root_scope = Arc::new(Scope::new(""));
        let mut scopes: HashMap<String, Arc<Scope>> = HashMap::new();
        scopes.insert(String::new(), Arc::clone(&root_scope));

        let mut getters = HashMap::new();
        let mut mutations = HashMap::new();
        let mut actions = HashMap::new();

        for placement in Walker::new(options.as_ref()).walk() {
            let scope = scopes
                .entry(placement.prefix.clone())
                .or_insert_with(|| Arc::new(Scope::new(placement.prefix.clone())));
            let module = Arc::new(ModuleInfo {
                path: placement.module_path.clone(),
                scope: Arc::clone(scope),
            });

            let node = placement.node;
            register(&mut getters, &placement.prefix, &node.getters, &module, "getter");
            register(&mut mutations, &placement.prefix, &node.mutations, &module, "mutation");
            register(&mut actions, &placement.prefix, &node.actions, &module, "action");
        }

        debug!(
            getters = getters.len(),
            mutations = mutations.len(),
            actions = actions.len(),
            namespaces = scopes.len(),
            "Store built"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                options,
                state: RwLock::new(initial),
                getters,
                mutations,
                actions,
                root_scope,
            }),
        })
    }

    /// Commit a mutation by full dispatch key.
    pub fn commit(&self, key: &str, payload: Value) -> Result<(), StoreError> {
        self.inner.commit(key, payload)
    }

    /// Dispatch an action by full dispatch key.
    pub fn dispatch(&self, key: &str, payload: Value) -> Pending {
        StoreInner::dispatch(&self.inner, key, payload)
    }

    /// Evaluate a getter by full dispatch key.
    pub fn getter(&self, key: &str) -> Result<Value, StoreError> {
        StoreInner::getter(&self.inner, key)
    }

    /// Snapshot of the whole state tree.
    pub fn state(&self) -> Value {
        self.inner.root_state()
    }

    pub fn options(&self) -> &Arc<ModuleOptions> {
        &self.inner.options
    }

    pub fn root_getters(&self) -> Arc<dyn GetterSource> {
        Arc::new(StoreInner::root_handle(&self.inner))
    }

    pub fn root_committer(&self) -> Arc<dyn Committer> {
        Arc::new(StoreInner::root_handle(&self.inner))
    }

    pub fn root_dispatcher(&self) -> Arc<dyn Dispatcher> {
        Arc::new(StoreInner::root_handle(&self.inner))
    }
}

fn register<F: Clone>(
    table: &mut HashMap<String, Registered<F>>,
    prefix: &str,
    declared: &std::collections::BTreeMap<String, F>,
    module: &Arc<ModuleInfo>,
    kind: &'static str,
) {
    for (name, handler) in declared {
        let key = dispatch_key(prefix, name);
        let entry = Registered {
            handler: handler.clone(),
            module: Arc::clone(module),
        };
        if let Some(previous) = table.insert(key.clone(), entry) {
            debug!(
                kind,
                key = %key,
                replaced = %previous.module.path,
                by = %module.path,
                "Dispatch key declared twice, keeping the later one"
            );
        }
    }
}
