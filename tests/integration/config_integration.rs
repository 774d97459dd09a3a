//! Configuration loading feeding a direct store

use super::test_utils::counter_module;
use direct_store::config::{ConfigLoader, FacadeConfig};
use direct_store::{ContextProvider, DirectStore, FacadeError, ModuleOptions, ModulePath, StoreError};
use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_file_settings_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[cache]
enabled = false
sweep_interval = 8

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();

    assert!(!config.cache.enabled);
    assert_eq!(config.cache.sweep_interval, 8);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(FacadeError::ConfigError(_))));
}

#[test]
fn test_invalid_logging_level_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"loud\"\n");

    assert!(ConfigLoader::load_from_file(&path).is_err());
}

#[tokio::test]
async fn test_disabled_cache_still_serves_contexts() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[cache]\nenabled = false\n");
    let config = ConfigLoader::load_from_file(&path).unwrap();

    let provider = ContextProvider::new();
    let same: Arc<Mutex<Option<bool>>> = Arc::default();
    let (p, seen) = (provider.clone(), Arc::clone(&same));
    let options = ModuleOptions::new().module(
        "counter",
        counter_module().namespaced(true).action("bump", move |ctx, _| {
            let path = ModulePath::parse("counter");
            let pair = p
                .module(&ctx, &path)
                .and_then(|first| Ok((first, p.module(&ctx, &path)?)));
            let outcome = match pair {
                Ok((first, second)) => {
                    *seen.lock() = Some(Arc::ptr_eq(&first, &second));
                    first
                        .commit()
                        .commit("increment", Value::Null)
                        .map(|_| Value::Null)
                        .map_err(|err| StoreError::ActionFailed(err.to_string()))
                }
                Err(err) => Err(StoreError::ActionFailed(err.to_string())),
            };
            async move { outcome }.boxed()
        }),
    );
    let store = DirectStore::with_config(options, &provider, &config).unwrap();

    store
        .dispatch()
        .module("counter")
        .unwrap()
        .dispatch("bump", Value::Null)
        .unwrap()
        .await
        .unwrap();

    assert_eq!(*same.lock(), Some(false));
    assert_eq!(store.state()["counter"]["count"], 1);
    assert!(store.factory().stats().caches.iter().all(|(_, stats)| stats.entries == 0));
}

#[test]
fn test_default_config_validates() {
    assert!(FacadeConfig::default().validate().is_ok());
}
