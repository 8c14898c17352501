//! Wire types for the hosted agent service.
//!
//! The service speaks the assistants REST dialect: uploaded files, vector
//! stores, agents, threads, messages, and runs. Unknown statuses and content
//! segments are tolerated so newer service versions do not break decoding.

use serde::{Deserialize, Serialize};

/// A document uploaded to the service's file store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Status of a vector store build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    InProgress,
    Completed,
    Expired,
    #[serde(other)]
    Unknown,
}

/// File ingestion counters reported by the vector store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileCounts {
    #[serde(default)]
    pub in_progress: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub total: u32,
}

/// A vector store built over uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: IndexStatus,
    #[serde(default)]
    pub file_counts: FileCounts,
}

/// Summary of a registered agent, as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl AgentSummary {
    /// Human-readable creation date, or "unknown" if the service omitted it.
    pub fn created_display(&self) -> String {
        self.created_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Request body for registering an agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDefinition {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

/// A tool the agent may invoke during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    /// A locally registered function the service calls back into.
    Function { function: FunctionSpec },
    /// The hosted document-search capability.
    FileSearch,
}

/// Declared schema for a function tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Resources bound to the agent's hosted tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

/// Vector stores available to the hosted file-search tool.
#[derive(Debug, Clone, Serialize)]
pub struct FileSearchResources {
    pub vector_store_ids: Vec<String>,
}

/// A remote conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    #[serde(other)]
    Unknown,
}

/// One content segment of a thread message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Unsupported,
}

/// Text payload of a message segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// A message on a conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl ThreadMessage {
    /// First text-typed content segment, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|segment| match segment {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Unsupported => None,
        })
    }
}

/// Status of a remote run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run has reached a state the service will not advance.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Failed | RunStatus::Completed | RunStatus::Expired
        )
    }
}

/// A single remote execution of an agent against a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// Action the service requires before the run can continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredAction {
    pub submit_tool_outputs: SubmitToolOutputs,
}

/// Tool calls the run is waiting on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RequiredToolCall>,
}

/// One pending tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredToolCall {
    pub id: String,
    pub function: FunctionCall,
}

/// Function name and raw JSON arguments of a pending tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Result of a local tool invocation, submitted back to the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// Error recorded on a failed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Acknowledgement for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionStatus {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Envelope for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_extracts_first_segment() {
        let message: ThreadMessage = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "role": "assistant",
                "content": [
                    {"type": "image_file", "image_file": {"file_id": "f1"}},
                    {"type": "text", "text": {"value": "Hello!", "annotations": []}},
                    {"type": "text", "text": {"value": "second"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.first_text(), Some("Hello!"));
    }

    #[test]
    fn test_first_text_none_without_text_segment() {
        let message: ThreadMessage = serde_json::from_str(
            r#"{"id": "msg_1", "role": "assistant", "content": []}"#,
        )
        .unwrap();
        assert_eq!(message.first_text(), None);
    }

    #[test]
    fn test_run_requires_action_decodes_tool_calls() {
        let run: Run = serde_json::from_str(
            r#"{
                "id": "run_1",
                "status": "requires_action",
                "required_action": {
                    "type": "submit_tool_outputs",
                    "submit_tool_outputs": {
                        "tool_calls": [
                            {
                                "id": "call_1",
                                "type": "function",
                                "function": {
                                    "name": "calculate_pizza_needed",
                                    "arguments": "{\"num_people\": 9}"
                                }
                            }
                        ]
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(run.status, RunStatus::RequiresAction);
        let action = run.required_action.unwrap();
        assert_eq!(action.submit_tool_outputs.tool_calls.len(), 1);
        assert_eq!(
            action.submit_tool_outputs.tool_calls[0].function.name,
            "calculate_pizza_needed"
        );
    }

    #[test]
    fn test_run_status_terminality() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(!RunStatus::RequiresAction.is_terminal());
    }

    #[test]
    fn test_unknown_run_status_tolerated() {
        let run: Run =
            serde_json::from_str(r#"{"id": "run_1", "status": "incomplete"}"#).unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(!run.status.is_terminal());
    }

    #[test]
    fn test_tool_definition_wire_shape() {
        let tools = vec![
            ToolDefinition::Function {
                function: FunctionSpec {
                    name: "calculate_pizza_needed".to_string(),
                    description: "desc".to_string(),
                    parameters: serde_json::json!({"type": "object"}),
                },
            },
            ToolDefinition::FileSearch,
        ];
        let encoded = serde_json::to_value(&tools).unwrap();
        assert_eq!(encoded[0]["type"], "function");
        assert_eq!(encoded[0]["function"]["name"], "calculate_pizza_needed");
        assert_eq!(encoded[1]["type"], "file_search");
    }
}
