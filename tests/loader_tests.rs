//! Integration tests for multi-source loading.
//!
//! Tests ConfigLoader::load_with_options() with real files:
//! - Documents, environment variables and flags in precedence order
//! - Multiple documents and failure handling

use cfgtree::config::{ConfigLoader, ConfigStore, ConfigTier, LoadOptions, Value};
use cfgtree::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Document covering scalars, nesting and lists.
fn harness_yaml() -> &'static str {
    r#"
a: O
b: O
c: O
sub:
  g: O
  h: O
l:
  - a: 1
  - a: 2
deep:
  deeper:
    deepest: x
environment:
  test:
    c: test-override
"#
}

fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write config file");
    path
}

#[test]
fn test_sources_layer_in_order() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "config.yaml", harness_yaml());

    let options = LoadOptions::default()
        .with_env([
            ("CONFIG_A", "E"),
            ("CONFIG_B", "E"),
            ("CONFIG_SUB__G", "E"),
            ("UNRELATED", "ignored"),
        ])
        .with_args([
            "-a=C".to_string(),
            "--sub__h=C".to_string(),
            format!("--config={}", config.display()),
        ]);

    let store = ConfigStore::new();
    let report = ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(store.get("a"), "C");
    assert_eq!(store.get("b"), "E");
    assert_eq!(store.get("c"), "O");
    assert_eq!(store.get("sub:g"), "E");
    assert_eq!(store.get("sub:h"), "C");
    assert_eq!(store.get("deep:deeper:deepest"), "x");

    #[derive(Debug, Deserialize)]
    struct Item {
        a: i64,
    }
    let items: Vec<Item> = store.get_as("l").unwrap().unwrap();
    assert_eq!(items.iter().map(|i| i.a).collect::<Vec<_>>(), vec![1, 2]);

    assert_eq!(report.documents().len(), 1);
    let tiers: Vec<ConfigTier> = report.sources.iter().map(|s| s.tier).collect();
    assert_eq!(
        tiers,
        vec![ConfigTier::Document, ConfigTier::Environment, ConfigTier::CommandLine]
    );
}

#[test]
fn test_default_environment_written_back() {
    let store = ConfigStore::new();
    ConfigLoader::load_with_options(&store, &LoadOptions::default()).unwrap();
    assert_eq!(store.environment(), "dev");
    assert_eq!(store.raw("env"), Some(Value::from("dev")));
}

#[test]
fn test_environment_from_variable() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "config.yaml", harness_yaml());

    let options = LoadOptions::default()
        .with_uri(config.display().to_string())
        .with_env([("CONFIG_ENV", "test")]);
    let store = ConfigStore::new();
    ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(store.environment(), "test");
    assert_eq!(store.get("c"), "test-override");
}

#[test]
fn test_config_uri_variable_with_multiple_documents() {
    let temp = TempDir::new().unwrap();
    let first = write_config(temp.path(), "first.yaml", "a: 1\nsection:\n  x: 1\n  y: 1\n");
    let second = write_config(temp.path(), "second.json", r#"{"section": {"x": 2}, "b": 2}"#);

    let uris = format!("{};{}", first.display(), second.display());
    let options = LoadOptions::default().with_env([("CONFIG_URI", uris.as_str())]);
    let store = ConfigStore::new();
    let report = ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(report.documents().len(), 2);
    assert_eq!(store.get_int("a"), 1);
    assert_eq!(store.get_int("b"), 2);
    // Later documents overwrite whole top-level keys.
    assert_eq!(store.get_int("section:x"), 2);
    assert_eq!(store.get_any("section:y"), None);
}

#[test]
fn test_component_option_selects_component() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "config.yaml",
        "port: 80\ncomponent:\n  api:\n    port: 8080\n",
    );

    let options = LoadOptions::default()
        .with_uri(config.display().to_string())
        .with_component("api");
    let store = ConfigStore::new();
    ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(store.component(), "api");
    assert_eq!(store.get_int("port"), 8080);
}

#[test]
fn test_component_from_document() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "config.yaml",
        "comp: worker\nthreads: 1\ncomponent:\n  worker:\n    threads: 8\n",
    );

    let options = LoadOptions::default().with_uri(config.display().to_string());
    let store = ConfigStore::new();
    ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(store.component(), "worker");
    assert_eq!(store.get_int("threads"), 8);
}

#[test]
fn test_missing_file_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let options = LoadOptions::default().with_uri(temp.path().join("nope.yaml").display().to_string());
    let store = ConfigStore::new();
    let err = ConfigLoader::load_with_options(&store, &options).unwrap_err();
    assert!(matches!(err, ConfigError::SourceUnavailable { .. }));
}

#[test]
fn test_malformed_document_keeps_earlier_sources() {
    let temp = TempDir::new().unwrap();
    let good = write_config(temp.path(), "good.yaml", "kept: yes-indeed\n");
    let bad = write_config(temp.path(), "bad.yaml", "broken: [unclosed\n");

    let options = LoadOptions::default()
        .with_uri(good.display().to_string())
        .with_uri(bad.display().to_string());
    let store = ConfigStore::new();
    let err = ConfigLoader::load_with_options(&store, &options).unwrap_err();

    assert!(matches!(err, ConfigError::MalformedInput { .. }));
    assert_eq!(store.get("kept"), "yes-indeed");
    assert_eq!(store.get_any("broken"), None);
}

#[test]
fn test_object_storage_uri_unsupported() {
    let options = LoadOptions::default().with_uri("s3://us-east-1/bucket/config.yaml");
    let store = ConfigStore::new();
    assert!(matches!(
        ConfigLoader::load_with_options(&store, &options),
        Err(ConfigError::UnsupportedSource(_))
    ));
}

#[test]
fn test_custom_prefix() {
    let options = LoadOptions::default()
        .with_prefix("MYAPP")
        .with_env([("MYAPP__SERVER__PORT", "9000"), ("CONFIG_SERVER__PORT", "1")])
        .with_args(["--myapp_server__host=localhost"]);
    let store = ConfigStore::new();
    ConfigLoader::load_with_options(&store, &options).unwrap();

    assert_eq!(store.get_int("server:port"), 9000);
    assert_eq!(store.get("server:host"), "localhost");
}
