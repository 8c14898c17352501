//! Agent session lifecycle: provisioning, run driving, the chat loop, and
//! teardown.

pub mod chat;
pub mod provision;
pub mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{classify_input, run_loop, ChatSession, LoopAction, LoopStats};
pub use provision::{provision, teardown, ProvisionedAgent};
pub use run::RunDriver;
