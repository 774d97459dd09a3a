//! Layout builder: second phase of the facade build.
//!
//! Takes the walker's placements and fills one [`LayoutNode`] per namespace
//! level with `member name -> dispatch key` maps. A layout has the exact shape
//! of the facades built from it, but no behavior; facades bind it to an
//! underlying getter source, committer or dispatcher.

use crate::tree::path::dispatch_key;
use crate::tree::shape::{Declaration, MemberKind};
use crate::tree::walker::{Placement, Walker};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// One namespace level of a facade layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    pub getters: BTreeMap<String, String>,
    pub mutations: BTreeMap<String, String>,
    pub actions: BTreeMap<String, String>,
    pub modules: BTreeMap<String, LayoutNode>,
}

/// Flattened layout entry, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEntry {
    pub kind: MemberKind,
    /// Facade access path, e.g. `a.b.g`.
    pub access: String,
    pub key: String,
}

impl LayoutNode {
    /// Build the layout of a whole tree, prefixes starting at `""`.
    #[instrument(skip(root))]
    pub fn from_tree<D: Declaration>(root: &D) -> LayoutNode {
        let start = Instant::now();
        let placements = Walker::new(root).walk();
        let layout = build_layout(&placements);
        debug!(
            modules = placements.len(),
            keys = layout.key_count(),
            duration_us = start.elapsed().as_micros() as u64,
            "Layout built"
        );
        layout
    }

    pub fn members(&self, kind: MemberKind) -> &BTreeMap<String, String> {
        match kind {
            MemberKind::Getter => &self.getters,
            MemberKind::Mutation => &self.mutations,
            MemberKind::Action => &self.actions,
        }
    }

    fn members_mut(&mut self, kind: MemberKind) -> &mut BTreeMap<String, String> {
        match kind {
            MemberKind::Getter => &mut self.getters,
            MemberKind::Mutation => &mut self.mutations,
            MemberKind::Action => &mut self.actions,
        }
    }

    /// Layout node reached by following namespaced module names.
    pub fn at(&self, facade_path: &[String]) -> Option<&LayoutNode> {
        facade_path
            .iter()
            .try_fold(self, |node, name| node.modules.get(name))
    }

    fn at_mut(&mut self, facade_path: &[String]) -> &mut LayoutNode {
        facade_path.iter().fold(self, |node, name| {
            node.modules.entry(name.clone()).or_default()
        })
    }

    /// Total number of member keys in this node and below.
    pub fn key_count(&self) -> usize {
        self.getters.len()
            + self.mutations.len()
            + self.actions.len()
            + self.modules.values().map(LayoutNode::key_count).sum::<usize>()
    }

    /// Every member of this node and below, depth-first, sorted by kind within
    /// a node.
    pub fn entries(&self) -> Vec<LayoutEntry> {
        let mut out = Vec::new();
        self.collect_entries("", &mut out);
        out
    }

    fn collect_entries(&self, access_prefix: &str, out: &mut Vec<LayoutEntry>) {
        for kind in MemberKind::ALL {
            for (name, key) in self.members(kind) {
                out.push(LayoutEntry {
                    kind,
                    access: format!("{}{}", access_prefix, name),
                    key: key.clone(),
                });
            }
        }
        for (name, child) in &self.modules {
            child.collect_entries(&format!("{}{}.", access_prefix, name), out);
        }
    }
}

/// Populate layout nodes from placements, in placement order.
///
/// A name already present on the target node is overwritten (last write wins).
pub fn build_layout<D: Declaration>(placements: &[Placement<'_, D>]) -> LayoutNode {
    let mut root = LayoutNode::default();

    for placement in placements {
        let target = root.at_mut(&placement.facade_path);
        for kind in MemberKind::ALL {
            let members = target.members_mut(kind);
            for name in placement.node.member_names(kind) {
                let key = dispatch_key(&placement.prefix, name);
                if let Some(previous) = members.insert(name.to_string(), key) {
                    trace!(
                        kind = kind.as_str(),
                        name,
                        previous = %previous,
                        module = %placement.module_path,
                        "Merged member replaces earlier declaration"
                    );
                }
            }
        }
    }

    root
}
