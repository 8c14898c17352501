//! Configuration settings for Pizzaiolo.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the agent service endpoint URL.
pub const ENDPOINT_ENV: &str = "PROJECT_ENDPOINT";

/// Environment variable holding the API key for the agent service.
pub const API_KEY_ENV: &str = "PROJECT_API_KEY";

/// Environment variable holding the optional secondary MCP tool server URL.
pub const MCP_SERVER_ENV: &str = "MCP_SERVER_URL";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub remote: RemoteSettings,
    pub agent: AgentSettings,
    pub run: RunSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Remote agent service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Agent service endpoint URL. The PROJECT_ENDPOINT environment
    /// variable takes precedence over this value.
    pub endpoint: Option<String>,
    /// Optional secondary MCP tool server URL. The MCP_SERVER_URL
    /// environment variable takes precedence.
    pub mcp_server_url: Option<String>,
    /// API version query parameter sent with every request.
    pub api_version: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum retry attempts for transient remote failures.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles per attempt).
    pub retry_initial_delay_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            mcp_server_url: None,
            api_version: "v1".to_string(),
            timeout_seconds: 120,
            max_retries: 3,
            retry_initial_delay_ms: 500,
        }
    }
}

/// Agent provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Name the agent is registered under. Existing agents with this
    /// name are deleted before provisioning.
    pub name: String,
    /// Model the agent runs on.
    pub model: String,
    /// Name of the vector store built over the reference documents.
    pub vector_store_name: String,
    /// Directory of reference documents to upload and index.
    pub docs_dir: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "Level 3 Pizza Agent".to_string(),
            model: "gpt-4o".to_string(),
            vector_store_name: "my_vectorstore".to_string(),
            docs_dir: "./contoso-stores".to_string(),
        }
    }
}

/// Run polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Interval between run status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum number of status polls before a run is abandoned.
    pub max_polls: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_polls: 120,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pizzaiolo")
            .join("config.toml")
    }

    /// Resolve the agent service endpoint: environment variable first,
    /// then the configuration file.
    pub fn endpoint(&self) -> crate::error::Result<String> {
        resolve_endpoint(
            std::env::var(ENDPOINT_ENV).ok(),
            self.remote.endpoint.as_deref(),
        )
    }

    /// Resolve the optional secondary MCP server URL.
    pub fn mcp_server_url(&self) -> Option<String> {
        std::env::var(MCP_SERVER_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.remote.mcp_server_url.clone())
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded reference documents directory path.
    pub fn docs_dir(&self) -> PathBuf {
        Self::expand_path(&self.agent.docs_dir)
    }
}

/// Endpoint precedence: environment over configuration file.
fn resolve_endpoint(env: Option<String>, config: Option<&str>) -> crate::error::Result<String> {
    env.filter(|v| !v.is_empty())
        .or_else(|| config.map(|v| v.to_string()))
        .ok_or_else(|| {
            crate::error::PizzaioloError::Config(format!(
                "Agent service endpoint not configured. Set {} or [remote].endpoint",
                ENDPOINT_ENV
            ))
        })
}
