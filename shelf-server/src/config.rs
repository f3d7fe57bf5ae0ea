//! Optional TOML configuration file.
//!
//! ```toml
//! near_expiry_days = 60
//! default_manufacturing_address = "Organic India Facility, Lucknow"
//! ```
//!
//! Missing keys keep their defaults. Command-line flags override the file.

use std::path::{Path, PathBuf};

use shelf_pipeline::DashboardConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("near_expiry_days must be positive, got {0}")]
    NearExpiryDays(i64),
}

/// Load the dashboard configuration, falling back to defaults when no file
/// is given.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let config = match path {
        None => DashboardConfig::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config = parse_config(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("loaded config from '{}'", path.display());
            config
        }
    };
    validate(config)
}

fn parse_config(text: &str) -> Result<DashboardConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Reject settings that would make the expiry buckets meaningless.
pub fn validate(config: DashboardConfig) -> Result<DashboardConfig, ConfigError> {
    if config.near_expiry_days <= 0 {
        return Err(ConfigError::NearExpiryDays(config.near_expiry_days));
    }
    Ok(config)
}
