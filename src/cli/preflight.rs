//! Pre-flight checks before expensive operations.
//!
//! Validates that required environment configuration is present before
//! provisioning resources on the remote service that would otherwise leak
//! on a midway failure.

use crate::config::{Settings, API_KEY_ENV};
use crate::error::{PizzaioloError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Chat provisions remote resources: needs the endpoint and an API key.
    Chat,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Chat => {
            check_endpoint(settings)?;
            check_api_key()?;
        }
    }
    Ok(())
}

/// Check the agent service endpoint is configured and is a valid URL.
fn check_endpoint(settings: &Settings) -> Result<()> {
    let endpoint = settings.endpoint()?;
    url::Url::parse(&endpoint).map_err(|e| {
        PizzaioloError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e))
    })?;
    Ok(())
}

/// Check the agent service API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(PizzaioloError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            API_KEY_ENV, API_KEY_ENV
        ))),
        Err(_) => Err(PizzaioloError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            API_KEY_ENV, API_KEY_ENV
        ))),
    }
}
