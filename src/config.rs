use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::roles::Role;
use crate::upload::DEFAULT_MAX_BYTES;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub seed: SeedConfig,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Locations of the seed documents.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Page holding the artifact table.
    pub artifacts: PathBuf,
    /// Page holding the language, artifact, and location lookup tables.
    pub search: PathBuf,
}

/// Element ids of the lookup tables on the search page.
#[derive(Debug, Deserialize, Clone)]
pub struct TablesConfig {
    #[serde(default = "default_language_table")]
    pub language: String,
    #[serde(default = "default_artifact_table")]
    pub artifact: String,
    #[serde(default = "default_location_table")]
    pub location: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            language: default_language_table(),
            artifact: default_artifact_table(),
            location: default_location_table(),
        }
    }
}

fn default_language_table() -> String {
    "langTable".to_string()
}
fn default_artifact_table() -> String {
    "artTable".to_string()
}
fn default_location_table() -> String {
    "locTable".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

/// One `[[users]]` entry.
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub name: String,
    pub role: Role,
    /// Hex SHA-256 of the password.
    pub password_sha256: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    // Validate tables
    let ids = [
        ("tables.language", &config.tables.language),
        ("tables.artifact", &config.tables.artifact),
        ("tables.location", &config.tables.location),
    ];
    for (key, id) in ids {
        if id.trim().is_empty() {
            anyhow::bail!("{} must not be empty", key);
        }
    }
    for (i, (key, id)) in ids.iter().enumerate() {
        if let Some((other, _)) = ids[i + 1..].iter().find(|(_, o)| o == id) {
            anyhow::bail!("{} and {} both name table '{}'", key, other, id);
        }
    }

    // Validate logging
    if config.logging.filter.trim().is_empty() {
        anyhow::bail!("logging.filter must not be empty");
    }

    // Validate upload
    if config.upload.max_bytes == 0 {
        anyhow::bail!("upload.max_bytes must be greater than zero");
    }

    // Validate users
    let mut seen = HashSet::new();
    for user in &config.users {
        if user.name.trim().is_empty() {
            anyhow::bail!("users.name must not be empty");
        }
        if !seen.insert(user.name.as_str()) {
            anyhow::bail!("user '{}' is listed more than once", user.name);
        }
        let digest = &user.password_sha256;
        if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("users.password_sha256 for '{}' must be 64 hex digits", user.name);
        }
    }

    Ok(config)
}
