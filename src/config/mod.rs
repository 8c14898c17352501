//! Configuration module for Pizzaiolo.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, GeneralSettings, RemoteSettings, RunSettings, Settings, API_KEY_ENV,
    ENDPOINT_ENV, MCP_SERVER_ENV,
};
