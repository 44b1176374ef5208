use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::attribute::DataSource;
use crate::logging::LogFormat;
use crate::options::{InitialOptions, OptionsFormat, URL_OPTIONS};

const CONFIG_FILE: &str = "config.toml";

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string with comments.
    /// All fields are commented out so defaults are used, but users can uncomment to override
    pub fn generate_default_config(&self) -> String {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config)
            .unwrap_or_else(|e| panic!("Failed to serialize default config: {}", e));

        Self::comment_all_fields(toml_str, Self::collect_all_comments())
    }

    fn collect_all_comments() -> HashMap<String, String> {
        let mut comments = HashMap::new();
        let sections: [(&str, &[(&str, &str)]); 5] = [
            ("", APP_COMMENTS),
            ("catalog", CATALOG_COMMENTS),
            ("defaults", DEFAULTS_COMMENTS),
            ("url", URL_COMMENTS),
            ("logging", LOGGING_COMMENTS),
        ];
        for (section, fields) in sections {
            for (field, comment) in fields {
                let path = if section.is_empty() {
                    field.to_string()
                } else {
                    format!("{}.{}", section, field)
                };
                comments.insert(path, comment.to_string());
            }
        }
        comments
    }

    /// Comment out all fields in TOML and add comments.
    /// Also adds missing Option fields as commented-out `# field = null`
    fn comment_all_fields(toml: String, comments: HashMap<String, String>) -> String {
        let mut result = String::new();
        result.push_str("# viewopts configuration file\n");
        result
            .push_str("# This file uses TOML format. See https://toml.io/ for syntax reference.\n");
        result.push('\n');

        let mut current_section = String::new();
        let mut seen_fields: HashSet<String> = HashSet::new();

        for line in toml.lines() {
            if let Some(section) = Self::extract_section_name(line) {
                if let Some(header) = SECTION_HEADERS.iter().find(|(s, _)| *s == section) {
                    result.push_str(header.1);
                    result.push('\n');
                }
                current_section = section;
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
                continue;
            }

            if let Some(field_path) = Self::extract_field_path(line, &current_section) {
                if let Some(comment) = comments.get(&field_path) {
                    for comment_line in comment.lines() {
                        result.push_str("# ");
                        result.push_str(comment_line);
                        result.push('\n');
                    }
                }
                seen_fields.insert(field_path);
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        Self::add_missing_option_fields(result, &comments, &seen_fields)
    }

    /// Add Option fields that weren't serialized because they're None
    fn add_missing_option_fields(
        mut result: String,
        comments: &HashMap<String, String>,
        seen_fields: &HashSet<String>,
    ) -> String {
        let option_fields = [
            "defaults.select_columns",
            "defaults.format",
            "defaults.max_lines",
            "url.base_url",
        ];

        let mut missing_by_section: HashMap<&str, Vec<&str>> = HashMap::new();
        for field_path in option_fields {
            if seen_fields.contains(field_path) || !comments.contains_key(field_path) {
                continue;
            }
            if let Some((section, _)) = field_path.split_once('.') {
                missing_by_section.entry(section).or_default().push(field_path);
            }
        }

        for (section, fields) in &missing_by_section {
            let section_header = format!("[{}]", section);
            if let Some(section_pos) = result.find(&section_header) {
                let after_header_start = section_pos + section_header.len();
                let newline_pos = result[after_header_start..].find('\n').unwrap_or(0);
                let insert_pos = after_header_start + newline_pos + 1;

                let mut new_content = String::new();
                for field_path in fields {
                    if let Some(comment) = comments.get(*field_path) {
                        for comment_line in comment.lines() {
                            new_content.push_str("# ");
                            new_content.push_str(comment_line);
                            new_content.push('\n');
                        }
                    }
                    let field_name = field_path.rsplit('.').next().unwrap_or(field_path);
                    new_content.push_str(&format!("# {} = null\n", field_name));
                    new_content.push('\n');
                }

                result.insert_str(insert_pos, &new_content);
            }
        }

        result
    }

    /// Extract section name from TOML line like "[defaults]"
    fn extract_section_name(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            Some(trimmed[1..trimmed.len() - 1].to_string())
        } else {
            None
        }
    }

    fn extract_field_path(line: &str, current_section: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }

        let (field_name, _) = trimmed.split_once('=')?;
        let field_name = field_name.trim();
        if current_section.is_empty() {
            Some(field_name.to_string())
        } else {
            Some(format!("{}.{}", current_section, field_name))
        }
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path(CONFIG_FILE);

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, self.generate_default_config())?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub catalog: CatalogConfig,
    pub defaults: DefaultsConfig,
    pub url: UrlConfig,
    pub logging: LoggingConfig,
}

const APP_COMMENTS: &[(&str, &str)] = &[(
    "version",
    "Configuration format version (for future compatibility)",
)];

const SECTION_HEADERS: &[(&str, &str)] = &[
    (
        "catalog",
        "# ============================================================================\n# Attribute Catalog\n# ============================================================================",
    ),
    (
        "defaults",
        "# ============================================================================\n# Initial Options\n# ============================================================================\n# Used only when the view URL carries no options yet.",
    ),
    (
        "url",
        "# ============================================================================\n# Shareable URL\n# ============================================================================",
    ),
    (
        "logging",
        "# ============================================================================\n# Logging\n# ============================================================================",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub data_source: DataSource,
    pub aggregate_operator: String,
}

const CATALOG_COMMENTS: &[(&str, &str)] = &[
    (
        "data_source",
        "Data source whose attributes are offered as columns: \"logs\", \"traces\" or \"metrics\"",
    ),
    (
        "aggregate_operator",
        "Aggregate operator sent with the attribute lookup",
    ),
];

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            aggregate_operator: "noop".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn merge(&mut self, other: Self) {
        let default = CatalogConfig::default();
        if other.data_source != default.data_source {
            self.data_source = other.data_source;
        }
        if other.aggregate_operator != default.aggregate_operator {
            self.aggregate_operator = other.aggregate_operator;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    pub select_columns: Option<Vec<String>>,
    pub format: Option<OptionsFormat>,
    pub max_lines: Option<u32>,
}

const DEFAULTS_COMMENTS: &[(&str, &str)] = &[
    (
        "select_columns",
        "Columns shown in a fresh view, by identifier or attribute name\nExample: [\"service.name\", \"status\"]",
    ),
    ("format", "Row format of a fresh view: \"raw\", \"list\" or \"table\""),
    ("max_lines", "Lines rendered per row in a fresh view"),
];

impl DefaultsConfig {
    pub fn merge(&mut self, other: Self) {
        if other.select_columns.is_some() {
            self.select_columns = other.select_columns;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.max_lines.is_some() {
            self.max_lines = other.max_lines;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    pub param: String,
    pub base_url: Option<String>,
}

const URL_COMMENTS: &[(&str, &str)] = &[
    ("param", "Query parameter that carries the options"),
    (
        "base_url",
        "Base URL used when printing shareable links\nExample: \"https://observe.example.com/logs\"",
    ),
];

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            param: URL_OPTIONS.to_string(),
            base_url: None,
        }
    }
}

impl UrlConfig {
    pub fn merge(&mut self, other: Self) {
        if other.param != URL_OPTIONS {
            self.param = other.param;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

const LOGGING_COMMENTS: &[(&str, &str)] = &[
    (
        "level",
        "Log filter used when RUST_LOG is not set\nExample: \"viewopts=debug\"",
    ),
    ("format", "Log output format: \"pretty\" or \"json\""),
];

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LoggingConfig::default();
        if other.level != default.level {
            self.level = other.level;
        }
        if other.format != default.format {
            self.format = other.format;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            catalog: CatalogConfig::default(),
            defaults: DefaultsConfig::default(),
            url: UrlConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load configuration layered over the defaults from the manager's directory
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let config_path = manager.config_path(CONFIG_FILE);
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(&config_path)?);

        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_path.display(), e))?;

        Ok(config)
    }

    fn load_user_config(config_path: &Path) -> Result<AppConfig> {
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.catalog.merge(other.catalog);
        self.defaults.merge(other.defaults);
        self.url.merge(other.url);
        self.logging.merge(other.logging);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.url.param.trim().is_empty() {
            return Err(eyre!("url.param must not be empty"));
        }

        if self.defaults.max_lines == Some(0) {
            return Err(eyre!("defaults.max_lines must be greater than 0 when set"));
        }

        if let Some(columns) = &self.defaults.select_columns {
            let mut seen = HashSet::new();
            if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(eyre!("defaults.select_columns lists '{}' more than once", dup));
            }
        }

        Ok(())
    }

    /// Seed for a view whose URL carries no options yet
    pub fn initial_options(&self) -> InitialOptions {
        InitialOptions {
            select_columns: self.defaults.select_columns.clone(),
            format: self.defaults.format,
            max_lines: self.defaults.max_lines,
        }
    }
}
