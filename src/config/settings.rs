// Configuration structs

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::router::ModelType;

/// Crate-wide settings: where the two backends live and where metrics go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Dataset chat service (the retrieval-based support bot).
    #[serde(default)]
    pub dataset: DatasetSettings,

    /// Generative chat relay (holds the LLM credential server-side).
    #[serde(default)]
    pub relay: RelaySettings,

    /// Directory for per-day JSONL metrics files.
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Base URL for the dataset service's API routes.
    pub base_url: String,
    /// Per-request timeout. Timeouts read as "unavailable".
    pub timeout_seconds: u64,
    /// Which model variant to ask for.
    #[serde(default)]
    pub model_type: ModelType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// The relay's single POST endpoint.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            model_type: ModelType::Basic,
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888/.netlify/functions/chat".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: DatasetSettings::default(),
            relay: RelaySettings::default(),
            metrics_dir: default_metrics_dir(),
        }
    }
}

fn default_metrics_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".helpline/metrics"))
        .unwrap_or_else(|| PathBuf::from(".helpline/metrics"))
}

impl Settings {
    /// Path to the user's config file (~/.helpline/config.toml).
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".helpline/config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset.base_url.trim().is_empty() {
            bail!("dataset.base_url must not be empty");
        }
        if self.relay.base_url.trim().is_empty() {
            bail!("relay.base_url must not be empty");
        }
        if self.dataset.timeout_seconds == 0 {
            bail!("dataset.timeout_seconds must be greater than zero");
        }
        if self.relay.timeout_seconds == 0 {
            bail!("relay.timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    /// Write settings back to the config file as TOML.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
