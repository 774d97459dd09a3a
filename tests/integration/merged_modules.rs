//! Merged (non-namespaced) modules flatten into their parent

use super::test_utils::{counter_module, RecordingSink};
use direct_store::facade;
use direct_store::tree::{resolve_prefix, LayoutNode, ModulePath, ModuleShape};
use direct_store::{DirectStore, ModuleOptions};
use futures::executor::block_on;
use serde_json::json;

fn shape(json: &str) -> ModuleShape {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_merged_action_lands_on_parent() {
    let layout = LayoutNode::from_tree(&shape(
        r#"{ "actions": ["a1"], "modules": { "mod1": { "namespaced": false, "actions": ["a2"] } } }"#,
    ));
    let sink = RecordingSink::new();
    let dispatch = facade::dispatch(&layout, sink.clone());

    block_on(dispatch.dispatch("a2", json!("x")).unwrap()).unwrap();

    assert!(!dispatch.has_module("mod1"));
    assert!(dispatch.module("mod1").is_err());
    assert_eq!(sink.dispatches()[0].key, "a2");
}

#[test]
fn test_omitted_flag_means_merged() {
    let tree = shape(r#"{ "modules": { "mod1": { "mutations": ["m"] } } }"#);
    let layout = LayoutNode::from_tree(&tree);

    assert!(layout.modules.is_empty());
    assert_eq!(layout.mutations["m"], "m");
    assert_eq!(resolve_prefix(&tree, &ModulePath::parse("mod1")).unwrap(), "");
}

#[test]
fn test_merged_inside_namespaced_uses_namespace_prefix() {
    let tree = shape(
        r#"{ "modules": { "a": { "namespaced": true, "modules": { "b": { "getters": ["g"], "modules": { "c": { "namespaced": true, "actions": ["go"] } } } } } } }"#,
    );
    let layout = LayoutNode::from_tree(&tree);

    let a = layout.modules.get("a").unwrap();
    assert_eq!(a.getters["g"], "a/g");
    assert_eq!(a.modules["c"].actions["go"], "a/c/go");
    assert_eq!(resolve_prefix(&tree, &ModulePath::parse("a/b")).unwrap(), "a/");
    assert_eq!(resolve_prefix(&tree, &ModulePath::parse("a/b/c")).unwrap(), "a/c/");
}

#[test]
fn test_collision_last_write_wins() {
    // Root members are placed first, then modules in name order.
    let layout = LayoutNode::from_tree(&shape(
        r#"{ "mutations": ["reset"], "modules": { "x": { "mutations": ["reset"] }, "y": { "namespaced": true } } }"#,
    ));
    assert_eq!(layout.mutations.len(), 1);
    assert_eq!(layout.mutations["reset"], "reset");
}

#[test]
fn test_collision_resolves_to_later_handler_in_store() {
    let options = ModuleOptions::new()
        .state(json!({ "who": null }))
        .mutation("mark", |state, _| state["who"] = json!("root"))
        .module(
            "late",
            ModuleOptions::new()
                .state(json!({ "who": null }))
                .mutation("mark", |state, _| state["who"] = json!("late")),
        );
    let store = DirectStore::new(options).unwrap();

    store.commit().commit("mark", json!(null)).unwrap();
    assert_eq!(store.state()["who"], json!(null));
    assert_eq!(store.state()["late"]["who"], "late");
}

#[test]
fn test_merged_module_state_stays_nested() {
    let store = DirectStore::new(ModuleOptions::new().module("counter", counter_module())).unwrap();

    store.commit().commit("increment", json!(3)).unwrap();
    assert_eq!(store.getters().get("count").unwrap(), json!(3));
    assert_eq!(store.state(), json!({ "counter": { "count": 3 } }));
}

#[test]
fn test_unknown_module_path() {
    let tree = shape(r#"{ "modules": { "a": { "namespaced": true } } }"#);
    let err = resolve_prefix(&tree, &ModulePath::parse("a/missing/deeper")).unwrap_err();
    assert_eq!(err.to_string(), "Module not found in options tree: a/missing");
}
