//! Module paths and dispatch-key prefix resolution.
//!
//! A [`ModulePath`] names a module by its position in the options tree: every
//! module name from the root down, namespaced or not. The dispatch-key prefix
//! only includes the namespaced ones.

use crate::error::FacadeError;
use crate::tree::shape::Declaration;
use std::fmt;

/// Separator between namespace segments in a dispatch key.
pub const SEPARATOR: char = '/';

/// Position of a module in the options tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `a/b/c`. Empty segments are skipped, so `""` and `"/"` are the root.
    pub fn parse(path: &str) -> Self {
        Self::from_segments(path.split(SEPARATOR).filter(|s| !s.is_empty()))
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath::parse(path)
    }
}

/// Prefix for members of a namespaced child called `name`.
pub fn join_prefix(prefix: &str, name: &str) -> String {
    format!("{}{}{}", prefix, name, SEPARATOR)
}

/// Dispatch key of member `name` under `prefix`.
pub fn dispatch_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name)
}

/// Result of resolving a [`ModulePath`] against a tree.
#[derive(Debug)]
pub struct Resolved<'a, D> {
    pub node: &'a D,
    /// Dispatch-key prefix for members declared directly on `node`.
    pub prefix: String,
    /// Facade keys leading to the facade node that holds `node`'s members.
    pub facade_path: Vec<String>,
}

/// Walk `path` from `root`, extending the prefix at every namespaced module.
pub fn resolve<'a, D: Declaration>(
    root: &'a D,
    path: &ModulePath,
) -> Result<Resolved<'a, D>, FacadeError> {
    let mut node = root;
    let mut prefix = String::new();
    let mut facade_path = Vec::new();

    for (depth, name) in path.segments().iter().enumerate() {
        node = node.child(name).ok_or_else(|| {
            FacadeError::UnknownModule(
                ModulePath::from_segments(path.segments()[..=depth].iter().cloned()).to_string(),
            )
        })?;
        if node.is_namespaced() {
            prefix = join_prefix(&prefix, name);
            facade_path.push(name.clone());
        }
    }

    Ok(Resolved {
        node,
        prefix,
        facade_path,
    })
}

/// Dispatch-key prefix of the module at `path`: `""` at the root, `"a/b/"`
/// below namespaced modules `a` and `b`.
pub fn resolve_prefix<D: Declaration>(root: &D, path: &ModulePath) -> Result<String, FacadeError> {
    resolve(root, path).map(|resolved| resolved.prefix)
}
