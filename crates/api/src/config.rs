//! Service Configuration
//!
//! Layered: code defaults, then an optional `variant-predictor.toml`
//! file, then `VP_`-prefixed environment variables.

use serde::Deserialize;
use std::path::PathBuf;
use variant_lookup::DEFAULT_ROW_CAP;

/// Runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path to the serialized classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Path to the variant feature CSV
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,
    /// Maximum number of table rows to load
    #[serde(default = "default_row_cap")]
    pub table_row_cap: usize,
    /// Listen address for the API server
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/variant_classifier.json")
}

fn default_table_path() -> PathBuf {
    PathBuf::from("data/clinvar_features_engineered.csv")
}

fn default_row_cap() -> usize {
    DEFAULT_ROW_CAP
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            table_path: default_table_path(),
            table_row_cap: default_row_cap(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("variant-predictor").required(false))
            .add_source(config::Environment::with_prefix("VP"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.table_row_cap, DEFAULT_ROW_CAP);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.model_path.ends_with("variant_classifier.json"));
    }
}
