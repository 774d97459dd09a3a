//! Typed action and getter contexts.
//!
//! A [`ContextFactory`] turns the raw per-call context handed to an action or
//! getter into facades scoped to the declaring module, plus root facades that
//! address root keys from any depth. Every facade is memoized by the identity
//! of the sink it closes over; the assembled context is memoized by the
//! identity of the raw context. Asking twice for the context of the same call
//! returns the same `Arc`.

use crate::cache::{CacheConfig, CacheControl, CacheKey, CacheStats, ContextCache};
use crate::dispatch::{
    Committer, Dispatcher, GetterSource, RawContext, RawGetterContext, RootMode, StateSource,
};
use crate::error::FacadeError;
use crate::facade::{self, CommitFacade, DispatchFacade, GettersFacade};
use crate::options::ModuleOptions;
use crate::tree::{resolve, LayoutNode, ModulePath};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, instrument, trace};

/// Facades for one action call.
pub struct DirectContext {
    module: ModulePath,
    states: Arc<dyn StateSource>,
    getters: Arc<GettersFacade>,
    root_getters: Arc<GettersFacade>,
    commit: Arc<CommitFacade>,
    root_commit: Arc<CommitFacade>,
    dispatch: Arc<DispatchFacade>,
    root_dispatch: Arc<DispatchFacade>,
}

impl DirectContext {
    pub fn module_path(&self) -> &ModulePath {
        &self.module
    }

    /// Module-local state, read live.
    pub fn state(&self) -> Value {
        self.states.state()
    }

    pub fn root_state(&self) -> Value {
        self.states.root_state()
    }

    pub fn getters(&self) -> &GettersFacade {
        &self.getters
    }

    pub fn root_getters(&self) -> &GettersFacade {
        &self.root_getters
    }

    pub fn commit(&self) -> &CommitFacade {
        &self.commit
    }

    /// Commit facade over the root layout; every call is root-addressed.
    pub fn root_commit(&self) -> &CommitFacade {
        &self.root_commit
    }

    pub fn dispatch(&self) -> &DispatchFacade {
        &self.dispatch
    }

    /// Dispatch facade over the root layout; every call is root-addressed.
    pub fn root_dispatch(&self) -> &DispatchFacade {
        &self.root_dispatch
    }
}

impl fmt::Debug for DirectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectContext")
            .field("module", &self.module)
            .field("getters", &self.getters)
            .field("commit", &self.commit)
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

/// Facades for one getter evaluation.
pub struct DirectGetterContext {
    module: ModulePath,
    states: Arc<dyn StateSource>,
    getters: Arc<GettersFacade>,
    root_getters: Arc<GettersFacade>,
}

impl DirectGetterContext {
    pub fn module_path(&self) -> &ModulePath {
        &self.module
    }

    pub fn state(&self) -> Value {
        self.states.state()
    }

    pub fn root_state(&self) -> Value {
        self.states.root_state()
    }

    pub fn getters(&self) -> &GettersFacade {
        &self.getters
    }

    pub fn root_getters(&self) -> &GettersFacade {
        &self.root_getters
    }
}

impl fmt::Debug for DirectGetterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectGetterContext")
            .field("module", &self.module)
            .field("getters", &self.getters)
            .finish_non_exhaustive()
    }
}

/// Counters for every cache held by a [`ContextFactory`].
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FactoryStats {
    pub layouts: usize,
    pub caches: Vec<(&'static str, CacheStats)>,
}

/// Builds and memoizes typed contexts for one options tree.
pub struct ContextFactory {
    options: Arc<ModuleOptions>,
    root_layout: Arc<LayoutNode>,
    layouts: Mutex<HashMap<ModulePath, Arc<LayoutNode>>>,
    getters: ContextCache<GettersFacade>,
    commits: ContextCache<CommitFacade>,
    dispatches: ContextCache<DispatchFacade>,
    root_getters: ContextCache<GettersFacade>,
    root_commits: ContextCache<CommitFacade>,
    root_dispatches: ContextCache<DispatchFacade>,
    contexts: ContextCache<DirectContext>,
    getter_contexts: ContextCache<DirectGetterContext>,
}

impl ContextFactory {
    pub fn new(options: Arc<ModuleOptions>, cache: CacheConfig) -> Self {
        let root_layout = Arc::new(LayoutNode::from_tree(options.as_ref()));
        let mut layouts = HashMap::new();
        layouts.insert(ModulePath::root(), Arc::clone(&root_layout));

        Self {
            options,
            root_layout,
            layouts: Mutex::new(layouts),
            getters: ContextCache::new("getters", cache.clone()),
            commits: ContextCache::new("commit", cache.clone()),
            dispatches: ContextCache::new("dispatch", cache.clone()),
            root_getters: ContextCache::new("root_getters", cache.clone()),
            root_commits: ContextCache::new("root_commit", cache.clone()),
            root_dispatches: ContextCache::new("root_dispatch", cache.clone()),
            contexts: ContextCache::new("action_context", cache.clone()),
            getter_contexts: ContextCache::new("getter_context", cache),
        }
    }

    pub fn options(&self) -> &Arc<ModuleOptions> {
        &self.options
    }

    pub fn root_layout(&self) -> &Arc<LayoutNode> {
        &self.root_layout
    }

    /// Layout of the module at `path`, with keys local to that module.
    ///
    /// Resolved once per module path.
    pub fn module_layout(&self, path: &ModulePath) -> Result<Arc<LayoutNode>, FacadeError> {
        if let Some(layout) = self.layouts.lock().get(path) {
            return Ok(Arc::clone(layout));
        }

        let resolved = resolve(self.options.as_ref(), path)?;
        let layout = Arc::new(LayoutNode::from_tree(resolved.node));
        debug!(module = %path, keys = layout.key_count(), "Resolved module layout");

        let mut layouts = self.layouts.lock();
        Ok(Arc::clone(layouts.entry(path.clone()).or_insert(layout)))
    }

    /// Typed context for an action declared in the module at `path`.
    #[instrument(skip_all, fields(module = %path))]
    pub fn action_context(
        &self,
        raw: Arc<dyn RawContext>,
        path: &ModulePath,
    ) -> Result<Arc<DirectContext>, FacadeError> {
        let key = raw.identity().map(|id| CacheKey::new(id, path.clone()));
        self.contexts.get_or_create::<FacadeError, _>(key, || {
            trace!("Building action context");
            Ok(DirectContext {
                module: path.clone(),
                states: raw.states(),
                getters: self.module_getters(raw.getters(), path)?,
                root_getters: self.root_getters(raw.root_getters()),
                commit: self.module_commit(raw.committer(), path)?,
                root_commit: self.root_commit(raw.committer()),
                dispatch: self.module_dispatch(raw.dispatcher(), path)?,
                root_dispatch: self.root_dispatch(raw.dispatcher()),
            })
        })
    }

    /// Typed context for a getter declared in the module at `path`.
    #[instrument(skip_all, fields(module = %path))]
    pub fn getter_context(
        &self,
        raw: Arc<dyn RawGetterContext>,
        path: &ModulePath,
    ) -> Result<Arc<DirectGetterContext>, FacadeError> {
        let key = raw.identity().map(|id| CacheKey::new(id, path.clone()));
        self.getter_contexts.get_or_create::<FacadeError, _>(key, || {
            trace!("Building getter context");
            Ok(DirectGetterContext {
                module: path.clone(),
                states: raw.states(),
                getters: self.module_getters(raw.getters(), path)?,
                root_getters: self.root_getters(raw.root_getters()),
            })
        })
    }

    pub fn module_getters(
        &self,
        source: Arc<dyn GetterSource>,
        path: &ModulePath,
    ) -> Result<Arc<GettersFacade>, FacadeError> {
        let key = source.identity().map(|id| CacheKey::new(id, path.clone()));
        self.getters.get_or_create::<FacadeError, _>(key, || {
            let layout = self.module_layout(path)?;
            Ok(facade::getters(&layout, source))
        })
    }

    pub fn module_commit(
        &self,
        committer: Arc<dyn Committer>,
        path: &ModulePath,
    ) -> Result<Arc<CommitFacade>, FacadeError> {
        let key = committer.identity().map(|id| CacheKey::new(id, path.clone()));
        self.commits.get_or_create::<FacadeError, _>(key, || {
            let layout = self.module_layout(path)?;
            Ok(facade::commit(&layout, committer))
        })
    }

    pub fn module_dispatch(
        &self,
        dispatcher: Arc<dyn Dispatcher>,
        path: &ModulePath,
    ) -> Result<Arc<DispatchFacade>, FacadeError> {
        let key = dispatcher.identity().map(|id| CacheKey::new(id, path.clone()));
        self.dispatches.get_or_create::<FacadeError, _>(key, || {
            let layout = self.module_layout(path)?;
            Ok(facade::dispatch(&layout, dispatcher))
        })
    }

    /// Root getters facade over `source`.
    pub fn root_getters(&self, source: Arc<dyn GetterSource>) -> Arc<GettersFacade> {
        let key = source.identity().map(CacheKey::root);
        self.root_getters
            .get_or_create::<Infallible, _>(key, || Ok(facade::getters(&self.root_layout, source)))
            .unwrap_or_else(|never| match never {})
    }

    /// Root commit facade over `committer`, forcing root addressing.
    pub fn root_commit(&self, committer: Arc<dyn Committer>) -> Arc<CommitFacade> {
        let key = committer.identity().map(CacheKey::root);
        self.root_commits
            .get_or_create::<Infallible, _>(key, || {
                Ok(facade::commit(&self.root_layout, Arc::new(RootMode::new(committer))))
            })
            .unwrap_or_else(|never| match never {})
    }

    /// Root dispatch facade over `dispatcher`, forcing root addressing.
    pub fn root_dispatch(&self, dispatcher: Arc<dyn Dispatcher>) -> Arc<DispatchFacade> {
        let key = dispatcher.identity().map(CacheKey::root);
        self.root_dispatches
            .get_or_create::<Infallible, _>(key, || {
                Ok(facade::dispatch(&self.root_layout, Arc::new(RootMode::new(dispatcher))))
            })
            .unwrap_or_else(|never| match never {})
    }

    /// Drop cache entries whose key identity has no owner left.
    pub fn sweep(&self) -> usize {
        self.caches().iter().map(|cache| cache.sweep()).sum()
    }

    pub fn clear(&self) {
        for cache in self.caches() {
            cache.clear();
        }
    }

    pub fn stats(&self) -> FactoryStats {
        FactoryStats {
            layouts: self.layouts.lock().len(),
            caches: self
                .caches()
                .iter()
                .map(|cache| (cache.name(), cache.stats()))
                .collect(),
        }
    }

    fn caches(&self) -> [&dyn CacheControl; 8] {
        [
            &self.getters,
            &self.commits,
            &self.dispatches,
            &self.root_getters,
            &self.root_commits,
            &self.root_dispatches,
            &self.contexts,
            &self.getter_contexts,
        ]
    }
}

/// Late-bound handle to a store's [`ContextFactory`].
///
/// Created before the options tree so action and getter closures can capture
/// it, then bound once by [`crate::DirectStore`]. Holds the factory weakly:
/// actions live inside the store, and the store owns the factory.
#[derive(Clone, Default)]
pub struct ContextProvider {
    factory: Arc<OnceLock<Weak<ContextFactory>>>,
}

impl ContextProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&self, factory: &Arc<ContextFactory>) -> Result<(), FacadeError> {
        self.factory
            .set(Arc::downgrade(factory))
            .map_err(|_| FacadeError::AlreadyBound)
    }

    pub fn is_bound(&self) -> bool {
        self.factory
            .get()
            .map(|factory| factory.strong_count() > 0)
            .unwrap_or(false)
    }

    fn factory(&self) -> Result<Arc<ContextFactory>, FacadeError> {
        self.factory
            .get()
            .and_then(Weak::upgrade)
            .ok_or(FacadeError::Unbound)
    }

    /// Context for an action declared on the root options.
    pub fn root<C>(&self, context: &C) -> Result<Arc<DirectContext>, FacadeError>
    where
        C: RawContext + Clone + 'static,
    {
        self.module(context, &ModulePath::root())
    }

    /// Context for an action declared in the module at `path`.
    pub fn module<C>(&self, context: &C, path: &ModulePath) -> Result<Arc<DirectContext>, FacadeError>
    where
        C: RawContext + Clone + 'static,
    {
        self.factory()?
            .action_context(Arc::new(context.clone()), path)
    }

    /// Getter context for a getter declared on the root options.
    pub fn root_getters<C>(&self, context: &C) -> Result<Arc<DirectGetterContext>, FacadeError>
    where
        C: RawGetterContext + Clone + 'static,
    {
        self.module_getters(context, &ModulePath::root())
    }

    /// Getter context for a getter declared in the module at `path`.
    pub fn module_getters<C>(
        &self,
        context: &C,
        path: &ModulePath,
    ) -> Result<Arc<DirectGetterContext>, FacadeError>
    where
        C: RawGetterContext + Clone + 'static,
    {
        self.factory()?
            .getter_context(Arc::new(context.clone()), path)
    }
}

impl fmt::Debug for ContextProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextProvider")
            .field("bound", &self.is_bound())
            .finish()
    }
}
