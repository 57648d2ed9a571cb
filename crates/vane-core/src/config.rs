use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cities shown on the dashboard, fetched every cycle
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Upstream weather source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Refresh interval in minutes (watch mode)
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
}

fn default_cities() -> Vec<String> {
    ["London", "New York", "Tokyo", "Sydney", "Paris", "Dubai"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_refresh_minutes() -> u32 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched record stays valid, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the weather API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (optional here, can be set via OPENWEATHER_API_KEY)
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: std::env::var("OPENWEATHER_API_KEY").ok(), // Read from environment
        }
    }
}

impl SourceConfig {
    /// API key with the environment taking precedence over the config file.
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var("OPENWEATHER_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            cache: CacheConfig::default(),
            source: SourceConfig::default(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Validate city list
        if self.cities.is_empty() {
            result.add_error("cities", "At least one city must be configured");
        }
        for (i, city) in self.cities.iter().enumerate() {
            if city.trim().is_empty() {
                result.add_error(format!("cities[{}]", i), "City name is blank");
            }
        }

        // Validate cache TTL
        if self.cache.ttl_secs == 0 {
            result.add_error("cache.ttl_secs", "Cache TTL must be greater than 0");
        } else if self.cache.ttl_secs > 86400 {
            result.add_warning("cache.ttl_secs", "Cache TTL is more than 24 hours");
        }

        // Validate source URL
        self.validate_url(&self.source.base_url, "source.base_url", &mut result);

        // Validate API key (just warn if not configured)
        if self.source.effective_api_key().is_none() {
            result.add_warning(
                "source.api_key",
                "No API key configured - set OPENWEATHER_API_KEY or edit the config file",
            );
        }

        // Validate refresh interval
        if self.refresh_minutes == 0 {
            result.add_warning("refresh_minutes", "Watch-mode refresh disabled (0 minutes)");
        } else if self.refresh_minutes > 1440 {
            result.add_warning("refresh_minutes", "Refresh interval is more than 24 hours");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                // Validate port if explicitly specified
                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                    // Port is u16, so already in valid range 1-65535
                }
            }
            Err(e) => {
                result.add_error(
                    field_name,
                    format!("Invalid URL: {}", e),
                );
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("vane");

        Ok(config_dir.join("config.toml"))
    }
}
