//! # CLI Configuration
//!
//! Poll cadence and session file location. Read from a TOML file
//! (`config/checkout.toml` by default, or `--config`), with
//! `AFRIART_SESSION_FILE` overriding the session path.

use anyhow::Context;
use pay_core::PollConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_PATHS: [&str; 3] = [
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

/// Contents of `checkout.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub poll: PollSettings,

    /// Where the login session is kept
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_budget_secs")]
    pub budget_secs: u64,
}

fn default_interval_secs() -> u64 {
    PollConfig::DEFAULT_INTERVAL.as_secs()
}

fn default_budget_secs() -> u64 {
    PollConfig::DEFAULT_BUDGET.as_secs()
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            budget_secs: default_budget_secs(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load `explicit` (must exist), else the first default path found,
    /// else built-in defaults
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config = Self::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            tracing::debug!("Loaded checkout config from {}", path.display());
            return Ok(config);
        }

        for path in CONFIG_PATHS {
            if let Ok(content) = std::fs::read_to_string(path) {
                let config = Self::from_toml(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
                tracing::debug!("Loaded checkout config from {}", path);
                return Ok(config);
            }
        }

        tracing::debug!("No checkout config found, using defaults");
        Ok(Self::default())
    }

    pub fn poll_config(&self) -> anyhow::Result<PollConfig> {
        PollConfig::from_secs(self.poll.interval_secs, self.poll.budget_secs)
            .context("Invalid [poll] settings")
    }

    /// `AFRIART_SESSION_FILE`, then the config file, then `~/.afriart/session.json`
    pub fn session_file(&self, env_override: Option<PathBuf>) -> PathBuf {
        env_override
            .or_else(|| self.session_file.clone())
            .unwrap_or_else(default_session_file)
    }
}

fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".afriart").join("session.json"),
        None => PathBuf::from(".afriart-session.json"),
    }
}
