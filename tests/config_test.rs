use std::fs;
use tempfile::TempDir;
use viewopts::config::{AppConfig, ConfigManager};
use viewopts::{DataSource, LogFormat, OptionsFormat};

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

fn write_config(config_manager: &ConfigManager, content: &str) {
    config_manager
        .ensure_config_dir()
        .expect("Failed to create config dir");
    fs::write(config_manager.config_path("config.toml"), content)
        .expect("Failed to write config");
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");
    assert_eq!(config.catalog.data_source, DataSource::Logs);
    assert_eq!(config.catalog.aggregate_operator, "noop");
    assert_eq!(config.defaults.select_columns, None);
    assert_eq!(config.defaults.format, None);
    assert_eq!(config.defaults.max_lines, None);
    assert_eq!(config.url.param, "options");
    assert_eq!(config.url.base_url, None);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    assert!(template.contains("[catalog]"));
    assert!(template.contains("[defaults]"));
    assert!(template.contains("[url]"));
    assert!(template.contains("[logging]"));
    assert!(template.contains("version = \"0.1\""));

    // Option fields appear commented out even though they serialize to nothing
    assert!(template.contains("# select_columns = null"));
    assert!(template.contains("# base_url = null"));

    // Every non-comment line is blank: the template changes nothing until edited
    for line in template.lines() {
        let trimmed = line.trim();
        assert!(
            trimmed.is_empty() || trimmed.starts_with('#'),
            "uncommented line in template: {}",
            line
        );
    }
}

#[test]
fn test_generated_config_parses_to_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager
        .write_default_config(false)
        .expect("Failed to write config");

    let config = AppConfig::load_from(&config_manager).expect("Failed to load config");
    assert_eq!(config.version, "0.1");
    assert_eq!(config.url.param, "options");
}

#[test]
fn test_write_config_without_force_fails_if_exists() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager
        .write_default_config(false)
        .expect("First write should succeed");

    let result = config_manager.write_default_config(false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn test_write_config_with_force_overwrites() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let first_path = config_manager
        .write_default_config(false)
        .expect("First write should succeed");
    let second_path = config_manager
        .write_default_config(true)
        .expect("Second write with force should succeed");

    assert_eq!(first_path, second_path);
    assert!(first_path.exists());
}

#[test]
fn test_load_config_with_no_file() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config = AppConfig::load_from(&config_manager).expect("Should load default config");

    assert_eq!(config.version, "0.1");
    assert_eq!(config.catalog.aggregate_operator, "noop");
}

#[test]
fn test_load_minimal_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(
        &config_manager,
        r#"
version = "0.1"

[catalog]
data_source = "traces"

[defaults]
select_columns = ["service.name", "status"]
format = "table"
"#,
    );

    let config = AppConfig::load_from(&config_manager).expect("Failed to load config");

    assert_eq!(config.catalog.data_source, DataSource::Traces);
    assert_eq!(
        config.defaults.select_columns,
        Some(vec!["service.name".to_string(), "status".to_string()])
    );
    assert_eq!(config.defaults.format, Some(OptionsFormat::Table));

    // Unspecified values keep their defaults
    assert_eq!(config.catalog.aggregate_operator, "noop");
    assert_eq!(config.defaults.max_lines, None);
    assert_eq!(config.url.param, "options");

    let initial = config.initial_options();
    assert_eq!(initial.format, Some(OptionsFormat::Table));
    assert_eq!(initial.select_columns.map(|c| c.len()), Some(2));
}

#[test]
fn test_load_rejects_unparseable_file() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(&config_manager, "[defaults\nformat = ");

    let err = AppConfig::load_from(&config_manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_reports_invalid_values_with_path() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(&config_manager, "[defaults]\nmax_lines = 0\n");

    let err = AppConfig::load_from(&config_manager).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Invalid configuration"));
    assert!(message.contains("config.toml"));
}

#[test]
fn test_merge_configs() {
    let mut base = AppConfig::default();
    let mut override_config = AppConfig::default();

    override_config.catalog.aggregate_operator = "count".to_string();
    override_config.defaults.max_lines = Some(8);
    override_config.url.base_url = Some("https://observe.example.com/logs".to_string());
    override_config.logging.format = LogFormat::Json;

    base.merge(override_config);

    assert_eq!(base.catalog.aggregate_operator, "count");
    assert_eq!(base.defaults.max_lines, Some(8));
    assert_eq!(
        base.url.base_url.as_deref(),
        Some("https://observe.example.com/logs")
    );
    assert_eq!(base.logging.format, LogFormat::Json);

    // Unmodified values remain default
    assert_eq!(base.catalog.data_source, DataSource::Logs);
    assert_eq!(base.url.param, "options");
    assert_eq!(base.logging.level, "warn");
}

#[test]
fn test_validate_config_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_config_invalid_version() {
    let config = AppConfig {
        version: "1.0".to_string(),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Unsupported config version"));
}

#[test]
fn test_validate_empty_url_param() {
    let mut config = AppConfig::default();
    config.url.param = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_duplicate_default_columns() {
    let mut config = AppConfig::default();
    config.defaults.select_columns = Some(vec![
        "service".to_string(),
        "status".to_string(),
        "service".to_string(),
    ]);

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("'service'"));
}
