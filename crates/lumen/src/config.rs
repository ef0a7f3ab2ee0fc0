use config::{Config as ConfigLoader, ConfigError, Environment, File};
use lumen_types::DEFAULT_VARIANT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LumenConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long query results stay fresh in the cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding preferences. Without one, preferences live in memory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub default_variant: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_variant: DEFAULT_VARIANT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LumenConfig {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{LUMEN_ENV}.toml (LUMEN_ENV defaults to "dev")
    /// 3. Environment variables such as `LUMEN_API__BASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("LUMEN_ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("LUMEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [api]
            base_url = "https://lumen.example.com"
            timeout_secs = 10
            cache_ttl_secs = 120

            [storage]
            path = "/var/lib/lumen/preferences.json"

            [chat]
            default_variant = "research-analyst"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: LumenConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.cache_ttl(), Duration::from_secs(120));
        assert_eq!(
            config.storage.path.as_deref(),
            Some(Path::new("/var/lib/lumen/preferences.json"))
        );
        assert_eq!(config.chat.default_variant, "research-analyst");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: LumenConfig = toml::from_str("[api]\nbase_url = \"http://10.0.0.2:9000\"").unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.cache_ttl_secs, 60);
        assert!(config.storage.path.is_none());
        assert_eq!(config.chat.default_variant, DEFAULT_VARIANT);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"\nformat = \"pretty\"").unwrap();

        let config = LumenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }
}
