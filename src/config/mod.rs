pub mod cli;
pub mod toml_config;

use crate::core::import::ImportLimits;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use cli::CliArgs;

/// Resolved runtime settings: defaults, then the TOML file, then CLI/env overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity: IdentitySettings,
    pub import: ImportSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub url: String,
    pub service_key: String,
    pub timeout_seconds: u64,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            service_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub upload_dir: PathBuf,
    pub max_file_bytes: u64,
    pub max_rows: usize,
    pub timeout_seconds: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir().join("contact-hub-uploads"),
            max_file_bytes: 10 * 1024 * 1024,
            max_rows: 10_000,
            timeout_seconds: 60,
        }
    }
}

impl ImportSettings {
    pub fn limits(&self) -> ImportLimits {
        ImportLimits {
            upload_dir: self.upload_dir.clone(),
            max_file_bytes: self.max_file_bytes,
            max_rows: self.max_rows,
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Without a path the contacts live in memory only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: Option<PathBuf>,
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", self.server.port, 1)?;

        validate_url("identity.url", &self.identity.url)?;
        validate_non_empty_string("identity.service_key", &self.identity.service_key)?;
        validate_range("identity.timeout_seconds", self.identity.timeout_seconds, 1, 300)?;

        validate_path("import.upload_dir", &self.import.upload_dir)?;
        validate_positive_number("import.max_file_bytes", self.import.max_file_bytes, 1)?;
        validate_positive_number("import.max_rows", self.import.max_rows, 1)?;
        validate_range("import.timeout_seconds", self.import.timeout_seconds, 1, 3600)?;

        if let Some(path) = &self.store.path {
            validate_path("store.path", path)?;
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}
