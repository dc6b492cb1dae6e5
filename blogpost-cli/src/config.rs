//! Configuration management for blogpost-cli.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use blogpost_client::DEFAULT_API_URL;

/// CLI configuration stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the Blog-Post API.
    pub api_url: String,
}

impl CliConfig {
    /// Create a configuration pointing at the given API.
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
        }
    }

    /// Load the configuration from a directory.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("config.json");
        let contents = tokio::fs::read_to_string(&path)
            .await
            .context("Not configured. Run 'blogpost-cli init' first.")?;
        serde_json::from_str(&contents).context("Invalid configuration file")
    }

    /// Load the configuration, falling back to defaults when none was
    /// written yet. A present-but-broken file is still an error.
    pub async fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("config.json");
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).context("Failed to read configuration file"),
        };
        serde_json::from_str(&contents).context("Invalid configuration file")
    }

    /// Save the configuration to a directory.
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join("config.json");
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to save configuration")?;
        set_file_permissions_0600(&path).await?;
        Ok(())
    }

    /// Check if a configuration file exists.
    pub async fn exists(data_dir: &Path) -> bool {
        data_dir.join("config.json").exists()
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
#[cfg(unix)]
async fn set_file_permissions_0600(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    tokio::fs::set_permissions(path, perms)
        .await
        .context("Failed to set file permissions")?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_file_permissions_0600(_path: &Path) -> Result<()> {
    Ok(())
}
