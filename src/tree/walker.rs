//! Options tree walker: first phase of the layout build.
//!
//! Visits every module depth-first and records where its members land: the
//! facade node (by namespaced path) and the dispatch-key prefix. Merged
//! modules get the same facade path and prefix as their parent.

use crate::tree::path::{join_prefix, ModulePath};
use crate::tree::shape::Declaration;

/// Where one module's members are installed.
#[derive(Debug)]
pub struct Placement<'a, D> {
    /// Module position in the options tree.
    pub module_path: ModulePath,
    /// Namespaced module names leading to the target facade node.
    pub facade_path: Vec<String>,
    /// Dispatch-key prefix for this module's members.
    pub prefix: String,
    pub node: &'a D,
}

/// Walker over a declaration tree.
pub struct Walker<'a, D> {
    root: &'a D,
}

impl<'a, D: Declaration> Walker<'a, D> {
    pub fn new(root: &'a D) -> Self {
        Self { root }
    }

    /// Collect placements in traversal order: a node before its children,
    /// children in declaration-map order.
    ///
    /// Later placements overwrite earlier ones on name collisions, so this
    /// order is what decides last-write-wins.
    pub fn walk(&self) -> Vec<Placement<'a, D>> {
        let mut placements = Vec::new();
        Self::visit(
            self.root,
            ModulePath::root(),
            Vec::new(),
            String::new(),
            &mut placements,
        );
        placements
    }

    fn visit(
        node: &'a D,
        module_path: ModulePath,
        facade_path: Vec<String>,
        prefix: String,
        out: &mut Vec<Placement<'a, D>>,
    ) {
        let children = node.child_modules();
        out.push(Placement {
            module_path: module_path.clone(),
            facade_path: facade_path.clone(),
            prefix: prefix.clone(),
            node,
        });

        for (name, child) in children {
            let child_path = module_path.child(name);
            if child.is_namespaced() {
                let mut child_facade = facade_path.clone();
                child_facade.push(name.to_string());
                Self::visit(child, child_path, child_facade, join_prefix(&prefix, name), out);
            } else {
                Self::visit(child, child_path, facade_path.clone(), prefix.clone(), out);
            }
        }
    }
}
