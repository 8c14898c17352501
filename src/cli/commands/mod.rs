//! CLI command implementations.

mod chat;
mod config;
mod doctor;

pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
