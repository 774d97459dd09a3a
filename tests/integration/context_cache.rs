//! Context factory memoization over fake raw contexts

use super::test_utils::{FakeContext, RecordingSink};
use direct_store::cache::CacheConfig;
use direct_store::dispatch::{RawContext, RawGetterContext};
use direct_store::{ContextFactory, FacadeError, ModuleOptions, ModulePath};
use serde_json::json;
use std::sync::Arc;

fn options() -> Arc<ModuleOptions> {
    Arc::new(
        ModuleOptions::new()
            .mutation("reset", |state, _| *state = json!({}))
            .module(
                "cart",
                ModuleOptions::new()
                    .namespaced(true)
                    .mutation("add", |_, _| {})
                    .getter("total", |_| Ok(json!(0))),
            ),
    )
}

fn factory() -> ContextFactory {
    ContextFactory::new(options(), CacheConfig::default())
}

fn raw(ctx: &FakeContext) -> Arc<dyn RawContext> {
    Arc::new(ctx.clone())
}

#[test]
fn test_same_raw_context_returns_same_context() {
    let factory = factory();
    let sink = RecordingSink::new();
    let ctx = FakeContext::new(&sink);
    let cart = ModulePath::parse("cart");

    let first = factory.action_context(raw(&ctx), &cart).unwrap();
    let second = factory.action_context(raw(&ctx), &cart).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_module_position_is_part_of_the_key() {
    let factory = factory();
    let ctx = FakeContext::new(&RecordingSink::new());

    let root = factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();
    let cart = factory.action_context(raw(&ctx), &ModulePath::parse("cart")).unwrap();

    assert!(!Arc::ptr_eq(&root, &cart));
    assert!(root.commit().member("reset").is_some());
    assert!(cart.commit().member("add").is_some());
    assert!(cart.commit().member("reset").is_none());
}

#[test]
fn test_distinct_raw_contexts_share_facades_over_one_sink() {
    let factory = factory();
    let sink = RecordingSink::new();
    let cart = ModulePath::parse("cart");

    let a = factory.action_context(raw(&FakeContext::new(&sink)), &cart).unwrap();
    let b = factory.action_context(raw(&FakeContext::new(&sink)), &cart).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(std::ptr::eq(a.commit(), b.commit()));
    assert!(std::ptr::eq(a.root_dispatch(), b.root_dispatch()));
}

#[test]
fn test_module_facade_uses_local_keys() {
    let factory = factory();
    let sink = RecordingSink::new();
    let ctx = FakeContext::new(&sink);

    let direct = factory.action_context(raw(&ctx), &ModulePath::parse("cart")).unwrap();
    direct.commit().commit("add", json!(1)).unwrap();
    direct.root_commit().commit("reset", json!(null)).unwrap();

    let calls: Vec<(String, bool)> = sink.commits().into_iter().map(|c| (c.key, c.root)).collect();
    // Local keys go to the module-scoped committer as declared names.
    assert_eq!(calls, vec![("add".to_string(), false), ("reset".to_string(), true)]);
    assert_eq!(direct.state(), json!({ "local": true }));
    assert_eq!(direct.root_state(), json!({ "root": true }));
}

#[test]
fn test_anonymous_contexts_are_never_cached() {
    let factory = factory();
    let sink = RecordingSink::new();
    let ctx = FakeContext::anonymous(&sink);

    let first = factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();
    let second = factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    let stats = factory.stats();
    let (_, contexts) = stats.caches.iter().find(|(name, _)| *name == "action_context").unwrap();
    assert_eq!(contexts.entries, 0);
}

#[test]
fn test_disabled_cache_builds_fresh_values() {
    let factory = ContextFactory::new(
        options(),
        CacheConfig {
            enabled: false,
            sweep_interval: 0,
        },
    );
    let ctx = FakeContext::new(&RecordingSink::new());

    let first = factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();
    let second = factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_sweep_drops_entries_of_dead_contexts() {
    let factory = factory();
    let sink = RecordingSink::new();

    {
        let ctx = FakeContext::new(&sink);
        factory.action_context(raw(&ctx), &ModulePath::root()).unwrap();
    }
    // The sink is still alive, so only the context entry is dead.
    assert_eq!(factory.sweep(), 1);

    let stats = factory.stats();
    let entries = |name: &str| {
        stats
            .caches
            .iter()
            .find(|(cache, _)| *cache == name)
            .map(|(_, stats)| stats.entries)
            .unwrap()
    };
    assert_eq!(entries("action_context"), 0);
    assert_eq!(entries("commit"), 1);
    assert_eq!(entries("root_commit"), 1);
}

#[test]
fn test_getter_context_memoized_per_raw_context() {
    let factory = factory();
    let sink = RecordingSink::new();
    sink.set_value("total", json!(12));
    let ctx = FakeContext::new(&sink);
    let raw_getters: Arc<dyn RawGetterContext> = Arc::new(ctx.clone());
    let cart = ModulePath::parse("cart");

    let first = factory.getter_context(Arc::clone(&raw_getters), &cart).unwrap();
    let second = factory.getter_context(raw_getters, &cart).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.getters().get("total").unwrap(), json!(12));
}

#[test]
fn test_layouts_are_memoized_per_module() {
    let factory = factory();
    let cart = ModulePath::parse("cart");

    let first = factory.module_layout(&cart).unwrap();
    let second = factory.module_layout(&cart).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.mutations["add"], "add");
    assert!(Arc::ptr_eq(
        &factory.module_layout(&ModulePath::root()).unwrap(),
        factory.root_layout()
    ));
    assert_eq!(factory.stats().layouts, 2);
}

#[test]
fn test_unknown_module_is_reported() {
    let factory = factory();
    let ctx = FakeContext::new(&RecordingSink::new());

    match factory.action_context(raw(&ctx), &ModulePath::parse("cart/missing")) {
        Err(FacadeError::UnknownModule(path)) => assert_eq!(path, "cart/missing"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
