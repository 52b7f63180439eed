//! Configuration management for the Jira issue bridge
//!
//! Handles loading configuration from environment variables, TOML files,
//! and provides defaults for the optional settings.

use crate::error::{JiraBridgeError, JiraBridgeResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use url::Url;

/// Config file locations probed when `JIRA_BRIDGE_CONFIG` is not set
const CONFIG_CANDIDATES: [&str; 2] = ["config/jira-bridge.toml", "jira-bridge.toml"];

/// Main configuration structure for the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// `[jira.server]` connection settings (required)
    pub jira: JiraSection,

    /// Operating mode (default: serve)
    pub mode: RunMode,

    /// Project used by the startup demo (default: "RTFS")
    pub demo_project_key: String,
}

/// The `[jira]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSection {
    pub server: ServerConfig,
}

/// Connection settings for the Jira instance
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Absolute base URL, e.g. `https://example.atlassian.net`
    pub url: String,

    pub username: String,

    /// Password or API token
    pub password: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Base URL without trailing slashes, suitable for joining paths onto
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }
}

/// What the process does after the connection is up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Serve the tool capability over MCP until the host disconnects
    #[default]
    Serve,
    /// Create one example issue, log the outcome and exit
    Demo,
}

impl FromStr for RunMode {
    type Err = JiraBridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serve" => Ok(RunMode::Serve),
            "demo" => Ok(RunMode::Demo),
            other => Err(JiraBridgeError::config(format!(
                "Unknown mode '{}', expected 'serve' or 'demo'",
                other
            ))),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            jira: JiraSection::default(),
            mode: RunMode::Serve,
            demo_project_key: "RTFS".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables, TOML file, and defaults
    /// Priority: env vars > TOML file > defaults
    pub fn load() -> JiraBridgeResult<Self> {
        let mut config = Self::load_file()
            .map_err(|e| JiraBridgeError::config(format!("{:#}", e)))?
            .unwrap_or_default();

        config.load_from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Resolve and parse the config file, if any
    fn load_file() -> Result<Option<Self>> {
        if let Ok(path) = env::var("JIRA_BRIDGE_CONFIG") {
            let config = Self::load_from_file(&path)?;
            info!("Loaded configuration from {}", path);
            return Ok(Some(config));
        }

        for candidate in CONFIG_CANDIDATES {
            if Path::new(candidate).exists() {
                let config = Self::load_from_file(candidate)?;
                info!("Loaded configuration from {}", candidate);
                return Ok(Some(config));
            }
        }

        debug!("No TOML configuration file found, using defaults and environment variables");
        Ok(None)
    }

    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from environment variables
    fn load_from_env(&mut self) -> JiraBridgeResult<()> {
        if let Ok(url) = env::var("JIRA_SERVER_URL") {
            self.jira.server.url = url;
            debug!("Loaded JIRA_SERVER_URL from environment");
        }

        if let Ok(username) = env::var("JIRA_SERVER_USERNAME") {
            self.jira.server.username = username;
            debug!("Loaded JIRA_SERVER_USERNAME from environment");
        }

        if let Ok(password) = env::var("JIRA_SERVER_PASSWORD") {
            self.jira.server.password = password;
            debug!("Loaded JIRA_SERVER_PASSWORD from environment");
        }

        if let Ok(mode) = env::var("JIRA_BRIDGE_MODE") {
            self.mode = mode.parse()?;
            debug!("Set mode to {:?} from environment", self.mode);
        }

        if let Ok(project) = env::var("JIRA_DEMO_PROJECT") {
            self.demo_project_key = project;
            debug!("Set demo project to {} from environment", self.demo_project_key);
        }

        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> JiraBridgeResult<()> {
        let server = &self.jira.server;

        if server.url.trim().is_empty() {
            return Err(JiraBridgeError::config(
                "jira.server.url is required. Set JIRA_SERVER_URL or configure it in the TOML file.",
            ));
        }
        parse_server_url(&server.url)?;

        if server.username.is_empty() {
            return Err(JiraBridgeError::config(
                "jira.server.username is required. Set JIRA_SERVER_USERNAME or configure it in the TOML file.",
            ));
        }

        if server.password.is_empty() {
            return Err(JiraBridgeError::config(
                "jira.server.password is required. Set JIRA_SERVER_PASSWORD or configure it in the TOML file.",
            ));
        }

        if self.mode == RunMode::Demo && self.demo_project_key.trim().is_empty() {
            return Err(JiraBridgeError::config(
                "demo_project_key cannot be empty in demo mode",
            ));
        }

        info!("Configuration validation successful");
        Ok(())
    }

    /// Browsable URL of an issue on the configured instance
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.jira.server.base_url(), issue_key)
    }
}

/// Parse an absolute http(s) server URL
pub fn parse_server_url(raw: &str) -> JiraBridgeResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| JiraBridgeError::config(format!("Invalid Jira server URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(JiraBridgeError::config(format!(
            "Jira server URL must use http:// or https://. Got: {}",
            raw
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(JiraBridgeError::config(format!(
            "Jira server URL has no host: {}",
            raw
        )));
    }

    Ok(url)
}
