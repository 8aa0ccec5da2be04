//! Settings files and the options they produce.

use reportpage::config::{expand_env_vars, Settings, StoreBackend};
use reportpage::flatten::KeyCollision;
use std::io::Write;

fn write_config(contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("reportpage-{}.toml", uuid::Uuid::new_v4()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    let options = settings.query_options();

    assert_eq!(settings.store.backend, StoreBackend::Worker);
    assert_eq!(options.max_pages_to_load, 50);
    assert!(options.legacy_empty_range);
    assert_eq!(options.key_collision, KeyCollision::Overwrite);
}

#[test]
fn test_load_file() {
    let path = write_config(
        r#"
        [server]
        port = 9090

        [store]
        backend = "fixtures"
        fixtures = "demo.json"

        [paging]
        max_pages_to_load = 10
        legacy_empty_range = false

        [flatten]
        key_collision = "reject"
        "#,
    );

    let settings = Settings::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.server.bind_address(), "127.0.0.1:9090");
    assert_eq!(settings.store.backend, StoreBackend::Fixtures);
    assert_eq!(settings.store.fixtures.as_deref(), Some("demo.json"));

    let options = settings.query_options();
    assert_eq!(options.max_pages_to_load, 10);
    assert!(!options.legacy_empty_range);
    assert_eq!(options.key_collision, KeyCollision::Reject);
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("reportpage-does-not-exist.toml");
    assert!(Settings::from_file(&path).is_err());
}

#[test]
fn test_fixtures_backend_requires_path() {
    let path = write_config("[store]\nbackend = \"fixtures\"\n");
    let result = Settings::from_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}

#[test]
fn test_expand_env_vars_passthrough() {
    assert_eq!(expand_env_vars("no vars here").unwrap(), "no vars here");
    assert!(expand_env_vars("${REPORTPAGE_SURELY_UNSET_VAR}").is_err());
}
