//! Client interface for the hosted agent service.
//!
//! All remote operations go through the [`AgentService`] trait so callers
//! receive an explicit handle instead of reaching for a module-level client,
//! and so the session logic can be exercised against an in-process fake.

pub mod http;
pub mod models;

pub use http::HttpAgentService;
pub use models::{
    AgentDefinition, AgentSummary, DeletionStatus, FileCounts, FileSearchResources, FunctionCall,
    FunctionSpec, IndexStatus, ListResponse, MessageContent, MessageRole, RequiredAction,
    RequiredToolCall, Run, RunError, RunStatus, SearchIndex, SubmitToolOutputs, TextContent,
    Thread, ThreadMessage, ToolDefinition, ToolOutput, ToolResources, UploadedFile,
};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Operations consumed from the remote agent service.
///
/// Handles (file, index, agent, thread, message, run ids) are opaque strings
/// owned and life-cycled by the service.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Upload a local document to the service's file store.
    async fn upload_document(&self, path: &Path) -> Result<UploadedFile>;

    /// Delete an uploaded document.
    async fn delete_document(&self, file_id: &str) -> Result<()>;

    /// Create a vector store over previously uploaded documents.
    async fn create_search_index(&self, name: &str, file_ids: &[String]) -> Result<SearchIndex>;

    /// Fetch the current state of a vector store.
    async fn get_search_index(&self, index_id: &str) -> Result<SearchIndex>;

    /// Delete a vector store.
    async fn delete_index(&self, index_id: &str) -> Result<()>;

    /// List all registered agents.
    async fn list_agents(&self) -> Result<Vec<AgentSummary>>;

    /// Register a new agent.
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<AgentSummary>;

    /// Delete a registered agent.
    async fn delete_agent(&self, agent_id: &str) -> Result<()>;

    /// Create a new conversation thread.
    async fn create_thread(&self) -> Result<Thread>;

    /// Post a message to a thread.
    async fn post_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage>;

    /// List a thread's messages, most recent first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Start a run of an agent against a thread.
    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Submit local tool outputs a run is waiting on.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run>;
}
