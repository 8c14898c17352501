//! Pizzaiolo - Hosted Pizza Agent CLI
//!
//! A CLI client of a hosted agent service. It provisions the "Contoso
//! Pizza" ordering agent - uploading store reference documents, building a
//! vector store over them, and registering the agent with a local pizza
//! calculator tool and the hosted file-search tool - then runs an
//! interactive chat loop against it and tears everything down on exit.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `remote` - Capability-style client of the hosted agent service
//! - `tools` - Local tool registry and the pizza calculator
//! - `session` - Provisioning, run driving, the chat loop, teardown
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use pizzaiolo::config::Settings;
//! use pizzaiolo::remote::HttpAgentService;
//! use pizzaiolo::session::provision;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = HttpAgentService::from_settings(&settings)?;
//!
//!     let resources = provision(&service, &settings, None).await?;
//!     println!("Agent ready: {}", resources.agent_id);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod session;
pub mod tools;

pub use error::{PizzaioloError, Result};
