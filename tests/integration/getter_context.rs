//! Typed getter contexts

use super::test_utils::{action_error, counter_module};
use direct_store::{ContextProvider, DirectStore, ModuleOptions, ModulePath, StoreError};
use serde_json::json;

fn store_with_derived_getters() -> DirectStore {
    let provider = ContextProvider::new();
    let (local, root) = (provider.clone(), provider.clone());

    let counter = counter_module()
        .namespaced(true)
        .getter("double", move |ctx| {
            let direct = local
                .module_getters(ctx, &ModulePath::parse("counter"))
                .map_err(action_error)?;
            let count = direct.getters().get("count").map_err(action_error)?;
            Ok(json!(count.as_i64().unwrap_or(0) * 2))
        })
        .getter("summary", move |ctx| {
            let direct = root
                .module_getters(ctx, &ModulePath::parse("counter"))
                .map_err(action_error)?;
            Ok(json!({
                "module": direct.module_path().to_string(),
                "local": direct.state(),
                "label": direct.root_getters().get("label").map_err(action_error)?,
            }))
        });

    let options = ModuleOptions::new()
        .state(json!({ "name": "shop" }))
        .getter("label", |ctx| {
            Ok(json!(format!("{}!", ctx.state()["name"].as_str().unwrap_or(""))))
        })
        .module("counter", counter);

    DirectStore::with_provider(options, &provider).unwrap()
}

#[test]
fn test_getter_reads_local_getter_through_facade() {
    let store = store_with_derived_getters();
    let counter = store.getters().module("counter").unwrap();

    assert_eq!(counter.get("double").unwrap(), json!(0));
    store
        .commit()
        .module("counter")
        .unwrap()
        .commit("increment", json!(21))
        .unwrap();
    assert_eq!(counter.get("double").unwrap(), json!(42));
}

#[test]
fn test_getter_context_exposes_state_and_root_getters() {
    let store = store_with_derived_getters();

    let summary = store
        .getters()
        .module("counter")
        .unwrap()
        .get("summary")
        .unwrap();
    assert_eq!(
        summary,
        json!({ "module": "counter", "local": { "count": 0 }, "label": "shop!" })
    );
}

#[test]
fn test_getter_context_from_store_accessor() {
    let provider = ContextProvider::new();
    let p = provider.clone();
    let options = counter_module().getter("is_zero", move |ctx| {
        let direct = p.root_getters(ctx).map_err(|err| StoreError::ActionFailed(err.to_string()))?;
        Ok(json!(direct.getters().get("count").map_err(action_error)? == json!(0)))
    });
    let store = DirectStore::with_provider(options, &provider).unwrap();

    assert_eq!(store.getters().get("is_zero").unwrap(), json!(true));
    store.commit().commit("increment", json!(1)).unwrap();
    assert_eq!(store.getters().get("is_zero").unwrap(), json!(false));
}

#[test]
fn test_getter_contexts_are_not_shared_between_evaluations() {
    let store = store_with_derived_getters();
    let counter = store.getters().module("counter").unwrap();

    counter.get("double").unwrap();
    counter.get("double").unwrap();

    let stats = store.factory().stats();
    let (_, getter_contexts) = stats
        .caches
        .iter()
        .find(|(name, _)| *name == "getter_context")
        .unwrap();
    // Each evaluation has its own identity: two builds, no hits.
    assert_eq!(getter_contexts.misses, 2);
    assert_eq!(getter_contexts.hits, 0);
}
