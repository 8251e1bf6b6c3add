// File: src/config.rs
// Purpose: Configuration parsing from scrupal.toml

use crate::markdown::MarkdownOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "SCRUPAL_API_URL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// REST API the controllers talk to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Which route table to serve and how to match it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Application whose routes are used: "apidoc" or "admin"
    #[serde(default = "default_app")]
    pub app: String,

    /// Whether literal route segments ignore case (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,
}

/// Template lookup and markdown rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory holding HTML chunk templates, e.g. `chunks/apidoc/intro.html`
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    #[serde(default = "default_false")]
    pub allow_raw_html: bool,

    #[serde(default = "default_true")]
    pub markdown_tables: bool,
}

// Default values
fn default_base_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_app() -> String {
    "apidoc".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

// Default implementations
impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app: default_app(),
            case_insensitive: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            templates_dir: None,
            allow_raw_html: false,
            markdown_tables: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RenderConfig {
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            allow_raw_html: self.allow_raw_html,
            tables: self.markdown_tables,
        }
    }
}

impl Config {
    /// Load configuration from scrupal.toml
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

    /// Load configuration from default path (./scrupal.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("scrupal.toml")
    }

    /// Apply environment overrides on top of the file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        self
    }
}
