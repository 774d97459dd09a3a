//! Options tree: the caller's declaration of state, getters, mutations,
//! actions and nested modules.
//!
//! The facade never mutates an options tree. Once handed to
//! [`crate::DirectStore`] it is shared behind an `Arc` and only read.

use crate::dispatch::Pending;
use crate::error::StoreError;
use crate::store::{ActionContext, GetterContext};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Getter implementation: `(state, getters, root_state, root_getters) -> value`,
/// all reachable through the per-call [`GetterContext`].
pub type GetterFn = Arc<dyn Fn(&GetterContext) -> Result<Value, StoreError> + Send + Sync>;

/// Mutation implementation: `(state, payload)`.
pub type MutationFn = Arc<dyn Fn(&mut Value, Value) + Send + Sync>;

/// Action implementation: `(context, payload) -> pending value`.
pub type ActionFn = Arc<dyn Fn(ActionContext, Value) -> Pending + Send + Sync>;

/// Initial module state: a value, or a producer called once per store.
#[derive(Clone)]
pub enum StateSeed {
    Value(Value),
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl StateSeed {
    pub fn produce(&self) -> Value {
        match self {
            StateSeed::Value(value) => value.clone(),
            StateSeed::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for StateSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSeed::Value(value) => f.debug_tuple("Value").field(value).finish(),
            StateSeed::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// One store or module declaration.
///
/// `namespaced` is ignored on the root node.
#[derive(Clone, Default)]
pub struct ModuleOptions {
    pub namespaced: bool,
    pub state: Option<StateSeed>,
    pub getters: BTreeMap<String, GetterFn>,
    pub mutations: BTreeMap<String, MutationFn>,
    pub actions: BTreeMap<String, ActionFn>,
    pub modules: BTreeMap<String, ModuleOptions>,
}

/// Root declaration. Same shape as a module.
pub type StoreOptions = ModuleOptions;

impl ModuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaced(mut self, namespaced: bool) -> Self {
        self.namespaced = namespaced;
        self
    }

    pub fn state(mut self, state: Value) -> Self {
        self.state = Some(StateSeed::Value(state));
        self
    }

    /// Seed state from a producer instead of a fixed value.
    pub fn state_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.state = Some(StateSeed::Factory(Arc::new(producer)));
        self
    }

    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&GetterContext) -> Result<Value, StoreError> + Send + Sync + 'static,
    {
        self.getters.insert(name.into(), Arc::new(getter));
        self
    }

    pub fn mutation<F>(mut self, name: impl Into<String>, mutation: F) -> Self
    where
        F: Fn(&mut Value, Value) + Send + Sync + 'static,
    {
        self.mutations.insert(name.into(), Arc::new(mutation));
        self
    }

    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(ActionContext, Value) -> Pending + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn module(mut self, name: impl Into<String>, module: ModuleOptions) -> Self {
        self.modules.insert(name.into(), module);
        self
    }

    /// Initial state for this node alone, without child module state.
    pub fn seed_state(&self) -> Value {
        self.state
            .as_ref()
            .map(StateSeed::produce)
            .unwrap_or_else(|| Value::Object(Default::default()))
    }
}

impl fmt::Debug for ModuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleOptions")
            .field("namespaced", &self.namespaced)
            .field("state", &self.state)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("modules", &self.modules)
            .finish()
    }
}
