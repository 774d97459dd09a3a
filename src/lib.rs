//! direct-store: namespace-resolved, directly-callable facades over a
//! hierarchical dispatch store.
//!
//! A store is declared as a tree of modules holding state, getters,
//! mutations and actions. Namespaced modules prefix their members' dispatch
//! keys with their name; merged modules contribute to their parent. The
//! facades built here mirror that tree, so callers write
//! `store.commit().module("cart")?.commit("add", item)` instead of
//! `store.commit("cart/add", item)`.

pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod direct;
pub mod dispatch;
pub mod error;
pub mod facade;
pub mod identity;
pub mod logging;
pub mod options;
pub mod store;
pub mod tree;

pub use cache::{CacheConfig, CacheStats};
pub use context::{ContextFactory, ContextProvider, DirectContext, DirectGetterContext};
pub use direct::DirectStore;
pub use dispatch::{CallOptions, Pending};
pub use error::{FacadeError, OptionsError, StoreError};
pub use facade::{CommitFacade, DispatchFacade, GettersFacade};
pub use options::{ModuleOptions, StoreOptions};
pub use store::{ActionContext, GetterContext, Store};
pub use tree::{LayoutNode, ModulePath, ModuleShape};
