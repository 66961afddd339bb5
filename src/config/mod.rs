/// Configuration management for the nodeflow service
///
/// Handles logging, run history and catalog settings.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Run history configuration
    pub runs: RunsConfig,
    /// Workflow catalog configuration
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum log level ("trace", "debug", "info", "warn", "error")
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunsConfig {
    /// How many recent runs a listing returns (default: 20)
    pub list_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Seed the example order flow into an empty catalog
    pub seed_demo: bool,
}

impl Config {
    /// Build configuration from a variable lookup, falling back to defaults
    /// for absent or unparsable values
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            logging: LoggingConfig {
                level: var("NODEFLOW_LOG_LEVEL")
                    .map(|level| level.trim().to_lowercase())
                    .filter(|level| !level.is_empty())
                    .unwrap_or_else(|| "info".to_string()),
            },
            runs: RunsConfig {
                list_limit: var("NODEFLOW_RUN_LIST_LIMIT")
                    .and_then(|limit| limit.trim().parse().ok())
                    .unwrap_or(20),
            },
            catalog: CatalogConfig {
                seed_demo: var("NODEFLOW_SEED_DEMO")
                    .and_then(|flag| parse_flag(&flag))
                    .unwrap_or(true),
            },
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
