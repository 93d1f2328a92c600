use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ImportError;

/// Main service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ImporterConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-Agent sent with every page fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra per-site selector rules, consulted before the built-in table
    #[serde(default)]
    pub sites: Vec<SiteRuleConfig>,
}

/// Address the HTTP server binds to
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Selector pair for a recipe site, keyed by a host substring
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteRuleConfig {
    /// Substring matched against the page host (e.g. "example.com")
    pub host: String,
    /// CSS selector for ingredient lines
    pub ingredients: String,
    /// CSS selector for instruction steps
    pub instructions: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            sites: Vec::new(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_timeout() -> u64 {
    10
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 RecipeImporter/1.0".to_string()
}

impl ImporterConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_IMPORT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_IMPORT__SERVER__PORT
    pub fn load() -> Result<Self, ImportError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ImporterConfig::load`] for the precedence rules.
pub fn load_config() -> Result<ImporterConfig, ImportError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_IMPORT__SERVER__PORT
        .add_source(
            Environment::with_prefix("RECIPE_IMPORT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        let config = ImporterConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.timeout, 10);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ImporterConfig = Config::builder()
            .add_source(File::from_str("timeout = 8", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.timeout, 8);
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_site_rules_from_toml() {
        let toml = r#"
            [server]
            port = 9000

            [[sites]]
            host = "example-recipes.com"
            ingredients = ".ing li"
            instructions = ".method li"
        "#;
        let config: ImporterConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.sites,
            vec![SiteRuleConfig {
                host: "example-recipes.com".to_string(),
                ingredients: ".ing li".to_string(),
                instructions: ".method li".to_string(),
            }]
        );
    }
}
