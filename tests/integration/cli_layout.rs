//! CLI route table over shape files

use direct_store::cli::{load_shape, Commands, RunContext};
use direct_store::FacadeError;
use std::path::PathBuf;
use tempfile::TempDir;

const SHOP_TOML: &str = r#"
mutations = ["reset"]

[modules.cart]
namespaced = true
actions = ["checkout"]
getters = ["total"]

[modules.cart.modules.items]
mutations = ["add"]

[modules.user]
namespaced = true
getters = ["name"]
"#;

struct Fixture {
    _dir: TempDir,
    shape: PathBuf,
    ctx: RunContext,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let shape = dir.path().join("shop.toml");
    std::fs::write(&shape, SHOP_TOML).unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[logging]\nlevel = \"off\"\n").unwrap();
    let ctx = RunContext::new(Some(config)).unwrap();
    Fixture {
        _dir: dir,
        shape,
        ctx,
    }
}

#[test]
fn test_keys_json_lists_every_member() {
    let f = fixture();
    let output = f
        .ctx
        .execute(&Commands::Keys {
            shape: f.shape.clone(),
            format: "json".to_string(),
            kind: None,
        })
        .unwrap();

    let entries: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    let pairs: Vec<(String, String)> = entries
        .iter()
        .map(|e| {
            (
                e["access"].as_str().unwrap().to_string(),
                e["key"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(entries.len(), 5);
    assert!(pairs.contains(&("reset".to_string(), "reset".to_string())));
    assert!(pairs.contains(&("cart.checkout".to_string(), "cart/checkout".to_string())));
    assert!(pairs.contains(&("cart.add".to_string(), "cart/add".to_string())));
    assert!(pairs.contains(&("user.name".to_string(), "user/name".to_string())));
}

#[test]
fn test_keys_kind_filter() {
    let f = fixture();
    let output = f
        .ctx
        .execute(&Commands::Keys {
            shape: f.shape.clone(),
            format: "json".to_string(),
            kind: Some("getter".to_string()),
        })
        .unwrap();

    let entries: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["kind"] == "getter"));
}

#[test]
fn test_keys_text_is_a_table() {
    let f = fixture();
    let output = f
        .ctx
        .execute(&Commands::Keys {
            shape: f.shape.clone(),
            format: "text".to_string(),
            kind: None,
        })
        .unwrap();

    assert!(output.contains("Dispatch key"));
    assert!(output.contains("cart/checkout"));
}

#[test]
fn test_tree_nests_only_namespaced_modules() {
    let f = fixture();
    let output = f.ctx.execute(&Commands::Tree { shape: f.shape.clone() }).unwrap();

    assert!(output.starts_with("<root>"));
    assert!(output.contains("  cart/"));
    assert!(output.contains("    mutation add -> cart/add"));
    assert!(!output.contains("items/"));
}

#[test]
fn test_prefix_of_merged_and_namespaced_modules() {
    let f = fixture();
    let prefix = |module: &str| {
        f.ctx
            .execute(&Commands::Prefix {
                shape: f.shape.clone(),
                module: module.to_string(),
            })
            .unwrap()
    };

    assert_eq!(prefix(""), "<root>: (root namespace)");
    assert_eq!(prefix("cart"), "cart: cart/");
    assert_eq!(prefix("cart/items"), "cart/items: cart/");
}

#[test]
fn test_invalid_format_and_kind_are_errors() {
    let f = fixture();
    let bad_format = f.ctx.execute(&Commands::Keys {
        shape: f.shape.clone(),
        format: "yaml".to_string(),
        kind: None,
    });
    let bad_kind = f.ctx.execute(&Commands::Keys {
        shape: f.shape.clone(),
        format: "text".to_string(),
        kind: Some("module".to_string()),
    });

    assert!(matches!(bad_format, Err(FacadeError::ConfigError(_))));
    assert!(matches!(bad_kind, Err(FacadeError::ConfigError(_))));
}

#[test]
fn test_unreadable_shape_is_reported_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    match load_shape(&path) {
        Err(FacadeError::ShapeFile { path: reported, .. }) => {
            assert!(reported.ends_with("broken.json"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
