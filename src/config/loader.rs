// Configuration loader
// Loads settings from ~/.helpline/config.toml, environment variables, or defaults

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::settings::Settings;

/// Environment overrides, captured once so resolution is testable without
/// touching process-global state.
#[derive(Debug, Default)]
struct EnvOverrides {
    dataset_url: Option<String>,
    relay_url: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            dataset_url: std::env::var("HELPLINE_DATASET_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            relay_url: std::env::var("HELPLINE_RELAY_URL")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    fn apply(self, settings: &mut Settings) {
        if let Some(url) = self.dataset_url {
            settings.dataset.base_url = url;
        }
        if let Some(url) = self.relay_url {
            settings.relay.base_url = url;
        }
    }
}

/// Load configuration: config file first, then environment overrides on top
/// of the defaults, then the plain defaults. A missing file is not an error;
/// an unreadable or invalid one is.
pub fn load_config() -> Result<Settings> {
    resolve_config(&Settings::config_path()?, EnvOverrides::from_env())
}

/// File wins outright when present; the environment only fills in over the
/// defaults when there is no file.
fn resolve_config(config_path: &Path, env: EnvOverrides) -> Result<Settings> {
    if let Some(settings) = load_from_path(config_path)? {
        return Ok(settings);
    }

    let mut settings = Settings::default();
    env.apply(&mut settings);

    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn load_from_path(config_path: &Path) -> Result<Option<Settings>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    settings
        .validate()
        .context("Configuration validation failed")?;

    Ok(Some(settings))
}
