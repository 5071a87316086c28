// File: src/config.rs
// Purpose: Configuration parsing from fleetform.toml

use crate::validation::{RuleCatalog, RuleKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,

    /// Message template overrides keyed by rule name
    /// (`minLength = "At least {min} characters, please"`)
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

/// Form binding behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Quiet period before live validation runs on input
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Input types validated while the user types (others wait for blur)
    #[serde(default = "default_live_types")]
    pub live_types: Vec<String>,

    /// Move focus to the first invalid field on a failed submit
    #[serde(default = "default_true")]
    pub focus_first_invalid: bool,
}

// Default values
fn default_debounce_ms() -> u64 {
    500
}

fn default_live_types() -> Vec<String> {
    vec!["email".to_string(), "tel".to_string(), "url".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            live_types: default_live_types(),
            focus_first_invalid: true,
        }
    }
}

impl FormConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Whether fields of this input type validate on input
    pub fn is_live(&self, input_type: &str) -> bool {
        self.live_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(input_type))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./fleetform.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("fleetform.toml")
    }

    /// Apply `[messages]` overrides on top of `catalog`
    pub fn apply_messages(&self, catalog: &RuleCatalog) -> RuleCatalog {
        self.messages
            .iter()
            .fold(catalog.clone(), |catalog, (name, template)| {
                let kind = RuleKind::from_name(name);
                if !catalog.contains(&kind) {
                    tracing::warn!(rule = %name, "message override for unknown rule");
                }
                catalog.with_template(&kind, template.clone())
            })
    }

    /// The standard catalog with this configuration's message overrides
    pub fn catalog(&self) -> RuleCatalog {
        self.apply_messages(&RuleCatalog::standard())
    }
}
