use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::TILL_DIR;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub register: RegisterConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            register: RegisterConfig::default(),
            checkout: CheckoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Currency symbol shown before every amount.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Ask for confirmation before finalizing a sale in the TUI.
    #[serde(default = "default_true")]
    pub confirm: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            confirm: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode when no flag or env var is given.
    #[serde(default)]
    pub output: Option<String>,
}

/// Load `.till/config.toml` under the project root, falling back to
/// defaults when the file is absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(TILL_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from `dirs::config_dir()/till/config.toml`,
/// falling back to defaults when absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("till/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "$".to_string()
}
