//! Property-based tests for prefix resolution and facade layout

use direct_store::dispatch::{CallOptions, Committer};
use direct_store::facade;
use direct_store::identity::IdentityKey;
use direct_store::tree::{resolve_prefix, LayoutNode, MemberKind, ModulePath, ModuleShape};
use direct_store::StoreError;
use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..3)
}

fn shape_strategy() -> impl Strategy<Value = ModuleShape> {
    let leaf = (any::<bool>(), names(), names(), names()).prop_map(
        |(namespaced, getters, mutations, actions)| ModuleShape {
            namespaced,
            getters,
            mutations,
            actions,
            modules: BTreeMap::new(),
        },
    );

    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            any::<bool>(),
            names(),
            names(),
            names(),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..3),
        )
            .prop_map(|(namespaced, getters, mutations, actions, modules)| ModuleShape {
                namespaced,
                getters,
                mutations,
                actions,
                modules,
            })
    })
}

/// Every module path with its expected prefix and facade path, computed
/// directly from the namespaced flags along the way.
fn module_positions(shape: &ModuleShape) -> Vec<(ModulePath, String, Vec<String>)> {
    fn visit(
        node: &ModuleShape,
        path: ModulePath,
        facade_path: Vec<String>,
        out: &mut Vec<(ModulePath, String, Vec<String>)>,
    ) {
        let prefix: String = facade_path.iter().map(|name| format!("{}/", name)).collect();
        out.push((path.clone(), prefix, facade_path.clone()));
        for (name, child) in &node.modules {
            let mut child_facade = facade_path.clone();
            if child.namespaced {
                child_facade.push(name.clone());
            }
            visit(child, path.child(name.clone()), child_facade, out);
        }
    }

    let mut out = Vec::new();
    visit(shape, ModulePath::root(), Vec::new(), &mut out);
    out
}

#[derive(Default)]
struct Recorder {
    keys: Mutex<Vec<String>>,
}

impl Committer for Recorder {
    fn identity(&self) -> Option<IdentityKey> {
        None
    }

    fn commit(&self, key: &str, _payload: Value, _options: CallOptions) -> Result<(), StoreError> {
        self.keys.lock().push(key.to_string());
        Ok(())
    }
}

/// Dispatch key equals the facade access path with `.` read as `/`
#[test]
fn test_key_mirrors_access_path() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&shape_strategy(), |shape| {
            let layout = LayoutNode::from_tree(&shape);
            for entry in layout.entries() {
                prop_assert_eq!(entry.key.clone(), entry.access.replace('.', "/"));
            }
            Ok(())
        })
        .unwrap();
}

/// Resolved prefixes follow the namespaced flags, and every module's facade
/// node exists in the layout
#[test]
fn test_prefix_resolution_matches_namespacing() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&shape_strategy(), |shape| {
            let layout = LayoutNode::from_tree(&shape);
            for (path, expected, facade_path) in module_positions(&shape) {
                let prefix = resolve_prefix(&shape, &path).unwrap();
                prop_assert_eq!(prefix, expected);
                prop_assert!(layout.at(&facade_path).is_some());
            }
            Ok(())
        })
        .unwrap();
}

/// Building a layout twice from the same tree gives the same layout
#[test]
fn test_layout_determinism() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&shape_strategy(), |shape| {
            let first = LayoutNode::from_tree(&shape);
            let second = LayoutNode::from_tree(&shape.clone());
            prop_assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}

/// Each facade commit reaches the sink exactly once, with the member's key
#[test]
fn test_one_commit_per_call() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&shape_strategy(), |shape| {
            let layout = LayoutNode::from_tree(&shape);
            let recorder = Arc::new(Recorder::default());
            let commit = facade::commit(&layout, recorder.clone());

            let mutations: Vec<_> = layout
                .entries()
                .into_iter()
                .filter(|entry| entry.kind == MemberKind::Mutation)
                .collect();
            for entry in &mutations {
                let mut segments: Vec<&str> = entry.access.split('.').collect();
                let name = segments.pop().unwrap_or_default();
                let node = commit.at(&segments).unwrap();
                node.commit(name, json!(null)).unwrap();
            }

            let expected: Vec<String> = mutations.iter().map(|entry| entry.key.clone()).collect();
            prop_assert_eq!(recorder.keys.lock().clone(), expected);
            Ok(())
        })
        .unwrap();
}
