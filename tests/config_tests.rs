use infragraph::codegen::TargetFormat;
use infragraph::config::loader::{ENV_ADVISORY_ENDPOINT, ENV_ADVISORY_MODEL, ENV_LOG_LEVEL};
use infragraph::config::{ConfigError, ConfigLoader, ConfigValidator, EngineConfig};
use infragraph::logging::{LogFormat, LogLevel};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = EngineConfig::default();
    config.logging.level = LogLevel::Debug;
    config.logging.format = LogFormat::Json;
    config.advisory.endpoint = Some("http://localhost:11434".to_string());
    config.advisory.deadline_secs = 10;
    config.codegen.default_target = TargetFormat::Cloudformation;
    config.codegen.output_dir = Some(PathBuf::from("out"));
    config.validation.monthly_cost_ceiling = 750.0;

    let loader = ConfigLoader::new();
    loader.save_to_file(&config, &path).unwrap();
    let loaded = loader.load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = ConfigLoader::new().load(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(path) if path == missing));
}

#[test]
fn test_invalid_toml_is_a_deserialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[advisory\nmodel = 3").unwrap();
    let err = ConfigLoader::new().load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::DeserializationError(_)));
}

#[test]
fn test_environment_overrides() {
    let vars: HashMap<&str, &str> = [
        (ENV_ADVISORY_ENDPOINT, "http://gpu-box:11434"),
        (ENV_ADVISORY_MODEL, "qwen2.5"),
        (ENV_LOG_LEVEL, "trace"),
    ]
    .into_iter()
    .collect();

    let mut config = EngineConfig::default();
    ConfigLoader::new()
        .apply_overrides_from(&mut config, |key| vars.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.advisory.endpoint.as_deref(), Some("http://gpu-box:11434"));
    assert_eq!(config.advisory.model, "qwen2.5");
    assert_eq!(config.logging.level, LogLevel::Trace);
}

#[test]
fn test_empty_endpoint_override_disables_advisory() {
    let mut config = EngineConfig::default();
    config.advisory.endpoint = Some("http://localhost:11434".to_string());
    ConfigLoader::new()
        .apply_overrides_from(&mut config, |key| {
            (key == ENV_ADVISORY_ENDPOINT).then(|| "  ".to_string())
        })
        .unwrap();
    assert!(config.advisory.endpoint.is_none());
}

#[test]
fn test_bad_log_level_override_is_rejected() {
    let mut config = EngineConfig::default();
    let err = ConfigLoader::new()
        .apply_overrides_from(&mut config, |key| {
            (key == ENV_LOG_LEVEL).then(|| "chatty".to_string())
        })
        .unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_validator_rejections() {
    let validator = ConfigValidator::new();

    let mut config = EngineConfig::default();
    config.advisory.deadline_secs = 0;
    assert!(validator.validate(&config).is_err());

    let mut config = EngineConfig::default();
    config.validation.monthly_cost_ceiling = 0.0;
    assert!(validator.validate(&config).is_err());

    let mut config = EngineConfig::default();
    config.validation.cost_warning_ratio = 1.5;
    assert!(validator.validate(&config).is_err());

    let mut config = EngineConfig::default();
    config.advisory.endpoint = Some("http://localhost:11434".to_string());
    config.advisory.model = "  ".to_string();
    let err = validator.validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(message) if message.contains("model")));
}
