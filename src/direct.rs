//! Direct store: the entry point.
//!
//! Builds the underlying store from an options tree, lays out and binds the
//! three root facades once, and binds a [`ContextProvider`] so actions and
//! getters can ask for typed contexts.

use crate::cache::CacheConfig;
use crate::config::FacadeConfig;
use crate::context::{ContextFactory, ContextProvider, DirectContext, DirectGetterContext};
use crate::error::FacadeError;
use crate::facade::{self, CommitFacade, DispatchFacade, GettersFacade};
use crate::options::StoreOptions;
use crate::store::{ActionContext, GetterContext, Store};
use crate::tree::{LayoutNode, ModulePath};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A store bundled with its root facades.
pub struct DirectStore {
    original: Store,
    factory: Arc<ContextFactory>,
    provider: ContextProvider,
    getters: GettersFacade,
    commit: CommitFacade,
    dispatch: DispatchFacade,
}

impl DirectStore {
    pub fn new(options: StoreOptions) -> Result<Self, FacadeError> {
        Self::with_provider(options, &ContextProvider::new())
    }

    /// Build and bind `provider`, which action and getter closures inside
    /// `options` may already have captured.
    pub fn with_provider(options: StoreOptions, provider: &ContextProvider) -> Result<Self, FacadeError> {
        Self::build(options, provider, CacheConfig::default())
    }

    pub fn with_config(
        options: StoreOptions,
        provider: &ContextProvider,
        config: &FacadeConfig,
    ) -> Result<Self, FacadeError> {
        Self::build(options, provider, config.cache.clone())
    }

    fn build(options: StoreOptions, provider: &ContextProvider, cache: CacheConfig) -> Result<Self, FacadeError> {
        let options = Arc::new(options);
        let original = Store::new(Arc::clone(&options))?;
        let factory = Arc::new(ContextFactory::new(options, cache));

        let layout = factory.root_layout();
        let getters = facade::getters(layout, original.root_getters());
        let commit = facade::commit(layout, original.root_committer());
        let dispatch = facade::dispatch(layout, original.root_dispatcher());

        provider.bind(&factory)?;
        info!(keys = layout.key_count(), "Direct store ready");

        Ok(Self {
            original,
            factory,
            provider: provider.clone(),
            getters,
            commit,
            dispatch,
        })
    }

    /// Live root state.
    pub fn state(&self) -> Value {
        self.original.state()
    }

    pub fn getters(&self) -> &GettersFacade {
        &self.getters
    }

    pub fn commit(&self) -> &CommitFacade {
        &self.commit
    }

    pub fn dispatch(&self) -> &DispatchFacade {
        &self.dispatch
    }

    /// The underlying store, for string-keyed access.
    pub fn original(&self) -> &Store {
        &self.original
    }

    pub fn provider(&self) -> &ContextProvider {
        &self.provider
    }

    pub fn factory(&self) -> &Arc<ContextFactory> {
        &self.factory
    }

    /// Root facade layout: names and dispatch keys.
    pub fn layout(&self) -> &LayoutNode {
        self.factory.root_layout()
    }

    /// Typed context for an action declared on the root options.
    pub fn root_context(&self, context: &ActionContext) -> Result<Arc<DirectContext>, FacadeError> {
        self.module_context(context, &ModulePath::root())
    }

    /// Typed context for an action declared in the module at `path`.
    pub fn module_context(
        &self,
        context: &ActionContext,
        path: &ModulePath,
    ) -> Result<Arc<DirectContext>, FacadeError> {
        self.factory.action_context(Arc::new(context.clone()), path)
    }

    /// Typed context for a getter declared on the root options.
    pub fn root_getter_context(
        &self,
        context: &GetterContext,
    ) -> Result<Arc<DirectGetterContext>, FacadeError> {
        self.module_getter_context(context, &ModulePath::root())
    }

    /// Typed context for a getter declared in the module at `path`.
    pub fn module_getter_context(
        &self,
        context: &GetterContext,
        path: &ModulePath,
    ) -> Result<Arc<DirectGetterContext>, FacadeError> {
        self.factory.getter_context(Arc::new(context.clone()), path)
    }
}

impl fmt::Debug for DirectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectStore")
            .field("getters", &self.getters)
            .field("commit", &self.commit)
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}
