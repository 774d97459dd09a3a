//! Directly-callable facades.
//!
//! A facade mirrors the namespaced shape of an options tree. Each member
//! closes over a fixed dispatch key and a fixed underlying getter source,
//! committer or dispatcher; calling it forwards exactly one call with that key.
//! Nothing is validated or cached at call time: getters are read live, and
//! action results are handed back without being awaited.

use crate::dispatch::{CallOptions, Committer, Dispatcher, GetterSource, Pending};
use crate::error::{FacadeError, StoreError};
use crate::tree::{LayoutNode, MemberKind};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A facade member: something addressed by one dispatch key.
pub trait Member {
    const KIND: MemberKind;

    fn key(&self) -> &str;
}

/// Live accessor for one getter.
#[derive(Clone)]
pub struct GetterAccessor {
    key: String,
    source: Arc<dyn GetterSource>,
}

impl GetterAccessor {
    /// Current value of the getter. Never snapshotted.
    pub fn get(&self) -> Result<Value, StoreError> {
        self.source.get(&self.key)
    }
}

impl Member for GetterAccessor {
    const KIND: MemberKind = MemberKind::Getter;

    fn key(&self) -> &str {
        &self.key
    }
}

/// One-argument callable forwarding to a commit.
#[derive(Clone)]
pub struct MutationCaller {
    key: String,
    committer: Arc<dyn Committer>,
}

impl MutationCaller {
    pub fn call(&self, payload: Value) -> Result<(), StoreError> {
        self.committer
            .commit(&self.key, payload, CallOptions::default())
    }
}

impl Member for MutationCaller {
    const KIND: MemberKind = MemberKind::Mutation;

    fn key(&self) -> &str {
        &self.key
    }
}

/// One-argument callable forwarding to a dispatch.
#[derive(Clone)]
pub struct ActionCaller {
    key: String,
    dispatcher: Arc<dyn Dispatcher>,
}

impl ActionCaller {
    /// Whatever the underlying dispatch returns, unawaited.
    pub fn call(&self, payload: Value) -> Pending {
        self.dispatcher
            .dispatch(&self.key, payload, CallOptions::default())
    }
}

impl Member for ActionCaller {
    const KIND: MemberKind = MemberKind::Action;

    fn key(&self) -> &str {
        &self.key
    }
}

/// One namespace level of a facade.
pub struct FacadeNode<M> {
    path: String,
    members: BTreeMap<String, M>,
    modules: BTreeMap<String, FacadeNode<M>>,
}

pub type GettersFacade = FacadeNode<GetterAccessor>;
pub type CommitFacade = FacadeNode<MutationCaller>;
pub type DispatchFacade = FacadeNode<ActionCaller>;

impl<M: Member> FacadeNode<M> {
    /// Namespaced path of this node, `<root>` at the top.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn member(&self, name: &str) -> Option<&M> {
        self.members.get(name)
    }

    /// Like [`member`](Self::member), failing with [`FacadeError::UnknownMember`].
    pub fn require(&self, name: &str) -> Result<&M, FacadeError> {
        self.members
            .get(name)
            .ok_or_else(|| FacadeError::UnknownMember {
                kind: M::KIND.as_str(),
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    /// Nested facade of a namespaced child module.
    pub fn module(&self, name: &str) -> Result<&FacadeNode<M>, FacadeError> {
        self.modules
            .get(name)
            .ok_or_else(|| FacadeError::UnknownMember {
                kind: "module",
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Follow namespaced module names from this node.
    pub fn at<S: AsRef<str>>(&self, facade_path: &[S]) -> Result<&FacadeNode<M>, FacadeError> {
        facade_path
            .iter()
            .try_fold(self, |node, name| node.module(name.as_ref()))
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Members on this node only.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.modules.is_empty()
    }
}

impl GettersFacade {
    pub fn get(&self, name: &str) -> Result<Value, FacadeError> {
        Ok(self.require(name)?.get()?)
    }
}

impl CommitFacade {
    pub fn commit(&self, name: &str, payload: Value) -> Result<(), FacadeError> {
        Ok(self.require(name)?.call(payload)?)
    }
}

impl DispatchFacade {
    pub fn dispatch(&self, name: &str, payload: Value) -> Result<Pending, FacadeError> {
        Ok(self.require(name)?.call(payload))
    }
}

impl<M: Member> fmt::Debug for FacadeNode<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: BTreeMap<&str, &str> = self
            .members
            .iter()
            .map(|(name, member)| (name.as_str(), member.key()))
            .collect();
        f.debug_struct("FacadeNode")
            .field("kind", &M::KIND)
            .field("path", &self.path)
            .field("members", &keys)
            .field("modules", &self.modules)
            .finish()
    }
}

fn bind<M>(layout: &LayoutNode, kind: MemberKind, path: String, make: &dyn Fn(&str) -> M) -> FacadeNode<M> {
    let members = layout
        .members(kind)
        .iter()
        .map(|(name, key)| (name.clone(), make(key)))
        .collect();
    let modules = layout
        .modules
        .iter()
        .map(|(name, child)| {
            let child_path = if path == "<root>" {
                name.clone()
            } else {
                format!("{}/{}", path, name)
            };
            (name.clone(), bind(child, kind, child_path, make))
        })
        .collect();
    FacadeNode {
        path,
        members,
        modules,
    }
}

/// Getters facade over `source`.
pub fn getters(layout: &LayoutNode, source: Arc<dyn GetterSource>) -> GettersFacade {
    bind(layout, MemberKind::Getter, "<root>".to_string(), &|key| GetterAccessor {
        key: key.to_string(),
        source: Arc::clone(&source),
    })
}

/// Commit facade over `committer`.
pub fn commit(layout: &LayoutNode, committer: Arc<dyn Committer>) -> CommitFacade {
    bind(layout, MemberKind::Mutation, "<root>".to_string(), &|key| MutationCaller {
        key: key.to_string(),
        committer: Arc::clone(&committer),
    })
}

/// Dispatch facade over `dispatcher`.
pub fn dispatch(layout: &LayoutNode, dispatcher: Arc<dyn Dispatcher>) -> DispatchFacade {
    bind(layout, MemberKind::Action, "<root>".to_string(), &|key| ActionCaller {
        key: key.to_string(),
        dispatcher: Arc::clone(&dispatcher),
    })
}
