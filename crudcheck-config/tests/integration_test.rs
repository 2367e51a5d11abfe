//! Integration tests for crudcheck-config

use crudcheck_config::domains::logging::{LogFormat, LogLevel};
use crudcheck_config::*;
use std::path::PathBuf;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = HarnessConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("CRUDCHECK_BASE_URL", Some("http://backend.test:9000/api")),
        ("CRUDCHECK_HTTP_TIMEOUT", Some("60")),
        ("CRUDCHECK_SCHEMA_ROOT", Some("/opt/schemas")),
        ("CRUDCHECK_LOG_LEVEL", Some("debug")),
        ("CRUDCHECK_CLEANUP_ENABLED", Some("false")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.http.base_url, "http://backend.test:9000/api");
        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.schemas.root, PathBuf::from("/opt/schemas"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.cleanup.enabled);
    });
}

#[test]
fn test_invalid_env_override() {
    with_vars(vec![("CRUDCHECK_HTTP_TIMEOUT", Some("soon"))], || {
        let result = ConfigLoader::new().from_env();
        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("BOOKSTORE_BASE_URL", Some("https://books.example.com"))], || {
        let config = ConfigLoader::with_prefix("BOOKSTORE").from_env().unwrap();
        assert_eq!(config.http.base_url, "https://books.example.com");
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = HarnessConfig::generate_sample();
    let parsed: HarnessConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
}

#[test]
fn test_comprehensive_config() {
    let yaml = r#"
http:
  base_url: "http://localhost:18080"
  timeout: 45
  max_redirects: 5
  user_agent: "Test Agent"
  verify_ssl: false
  default_headers:
    Accept: "application/json"
    X-Tenant: "qa"

schemas:
  root: "fixtures/schemas"
  cache_compiled: false

logging:
  level: warn
  format: json

cleanup:
  enabled: true
  delete_confirmation: "removed"
  diagnostic_history: 5
"#;

    let config = with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        ConfigLoader::new().from_yaml_str(yaml).unwrap()
    });

    assert_eq!(config.http.base_url, "http://localhost:18080");
    assert_eq!(config.http.timeout, Duration::from_secs(45));
    assert_eq!(config.http.max_redirects, 5);
    assert!(!config.http.verify_ssl);
    assert_eq!(
        config.http.default_headers.get("X-Tenant").map(String::as_str),
        Some("qa")
    );
    assert_eq!(config.schemas.root, PathBuf::from("fixtures/schemas"));
    assert!(!config.schemas.cache_compiled);
    assert_eq!(config.logging.level, LogLevel::Warn);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.cleanup.delete_confirmation, "removed");
    assert_eq!(config.cleanup.diagnostic_history, 5);
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crudcheck.yaml");
    std::fs::write(&path, "http:\n  base_url: \"http://127.0.0.1:3000\"\n").unwrap();

    let config = with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        ConfigLoader::new().load(Some(&path)).unwrap()
    });
    assert_eq!(config.http.base_url, "http://127.0.0.1:3000");
    assert_eq!(config.http.timeout, Duration::from_secs(30));
}

#[test]
fn test_invalid_yaml_values_rejected() {
    let yaml = r#"
http:
  base_url: "not a url"
"#;
    let result = with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        ConfigLoader::new().from_yaml_str(yaml)
    });
    assert!(matches!(result, Err(ConfigError::DomainError { .. })));

    let yaml = r#"
cleanup:
  delete_confirmation: ""
"#;
    let result = with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        ConfigLoader::new().from_yaml_str(yaml)
    });
    assert!(matches!(result, Err(ConfigError::DomainError { .. })));
}
