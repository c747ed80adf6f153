use directories::ProjectDirs;
use eyre::Result;
use implreg_registry::{PendingPolicy, RegistryConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::render::OutputFormat;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Print the raw markup under each descriptor in text output.
    pub show_markup: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_markup: false,
        }
    }
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub async fn reset_at(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path).await?;
        Ok(config)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["registry", "pending_policy"] => {
                self.registry.pending_policy = value.parse::<PendingPolicy>()?;
            }
            ["registry", "base_url"] => {
                self.registry.base_url = if value.is_empty() {
                    None
                } else {
                    let candidate = RegistryConfig::default().with_base_url(value);
                    candidate.base_url()?;
                    candidate.base_url
                };
            }
            ["output", "format"] => {
                self.output.format = value.parse::<OutputFormat>()?;
            }
            ["output", "show_markup"] => {
                self.output.show_markup = value
                    .parse::<bool>()
                    .map_err(|_| eyre::eyre!("Invalid boolean value: {}", value))?;
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["registry", "pending_policy"] => self.registry.pending_policy.to_string(),
            ["registry", "base_url"] => self.registry.base_url.clone().unwrap_or_default(),
            ["output", "format"] => self.output.format.to_string(),
            ["output", "show_markup"] => self.output.show_markup.to_string(),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             Registry:\n\
             ├─ pending_policy: {}\n\
             └─ base_url: {}\n\
             Output:\n\
             ├─ format: {}\n\
             └─ show_markup: {}",
            self.registry.pending_policy,
            self.registry.base_url.as_deref().unwrap_or("(not set)"),
            self.output.format,
            self.output.show_markup,
        )
    }
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "implreg", "implreg") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".implreg").join("config")
    }
}
