//! Names-only view of an options tree.
//!
//! Prefix resolution and layout building only need names and `namespaced`
//! flags. [`Declaration`] exposes exactly that, so the same walk runs over a
//! live [`ModuleOptions`] tree or over a [`ModuleShape`] loaded from a file.

use crate::error::OptionsError;
use crate::options::ModuleOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The three kinds of named members a module declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Getter,
    Mutation,
    Action,
}

impl MemberKind {
    pub const ALL: [MemberKind; 3] = [MemberKind::Getter, MemberKind::Mutation, MemberKind::Action];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Getter => "getter",
            MemberKind::Mutation => "mutation",
            MemberKind::Action => "action",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names-only access to one node of an options tree.
pub trait Declaration {
    fn is_namespaced(&self) -> bool;

    /// Member names of `kind` declared directly on this node, in traversal order.
    fn member_names(&self, kind: MemberKind) -> Vec<&str>;

    /// Child modules in traversal order.
    fn child_modules(&self) -> Vec<(&str, &Self)>;

    fn child(&self, name: &str) -> Option<&Self>;
}

impl Declaration for ModuleOptions {
    fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    fn member_names(&self, kind: MemberKind) -> Vec<&str> {
        match kind {
            MemberKind::Getter => self.getters.keys().map(String::as_str).collect(),
            MemberKind::Mutation => self.mutations.keys().map(String::as_str).collect(),
            MemberKind::Action => self.actions.keys().map(String::as_str).collect(),
        }
    }

    fn child_modules(&self) -> Vec<(&str, &Self)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.modules.get(name)
    }
}

/// Serializable shape of an options tree (names and flags, no behavior).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleShape {
    #[serde(default)]
    pub namespaced: bool,
    #[serde(default)]
    pub getters: Vec<String>,
    #[serde(default)]
    pub mutations: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleShape>,
}

impl ModuleShape {
    /// Extract the shape of any declaration.
    pub fn of<D: Declaration>(node: &D) -> Self {
        let names = |kind| {
            node.member_names(kind)
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        ModuleShape {
            namespaced: node.is_namespaced(),
            getters: names(MemberKind::Getter),
            mutations: names(MemberKind::Mutation),
            actions: names(MemberKind::Action),
            modules: node
                .child_modules()
                .into_iter()
                .map(|(name, child)| (name.to_string(), ModuleShape::of(child)))
                .collect(),
        }
    }
}

impl Declaration for ModuleShape {
    fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    fn member_names(&self, kind: MemberKind) -> Vec<&str> {
        let names = match kind {
            MemberKind::Getter => &self.getters,
            MemberKind::Mutation => &self.mutations,
            MemberKind::Action => &self.actions,
        };
        names.iter().map(String::as_str).collect()
    }

    fn child_modules(&self) -> Vec<(&str, &Self)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.modules.get(name)
    }
}

/// Reject names that cannot form a dispatch key segment.
///
/// Collisions are not checked: merged modules resolve them last-write-wins.
pub fn validate<D: Declaration>(root: &D) -> Result<(), OptionsError> {
    validate_node(root, "<root>")
}

fn validate_node<D: Declaration>(node: &D, module: &str) -> Result<(), OptionsError> {
    for kind in MemberKind::ALL {
        for name in node.member_names(kind) {
            check_name(kind.as_str(), name, module)?;
        }
    }
    for (name, child) in node.child_modules() {
        check_name("module", name, module)?;
        let child_path = if module == "<root>" {
            name.to_string()
        } else {
            format!("{}/{}", module, name)
        };
        validate_node(child, &child_path)?;
    }
    Ok(())
}

fn check_name(kind: &'static str, name: &str, module: &str) -> Result<(), OptionsError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('/') {
        "name contains the namespace separator '/'"
    } else {
        return Ok(());
    };
    Err(OptionsError::InvalidName {
        kind,
        name: name.to_string(),
        module: module.to_string(),
        reason,
    })
}
