//! Scripted in-process agent service for session tests.

use crate::error::{PizzaioloError, Result};
use crate::remote::{
    AgentDefinition, AgentService, AgentSummary, FunctionCall, IndexStatus, MessageContent,
    MessageRole, RequiredAction, RequiredToolCall, Run, RunError, RunStatus, SearchIndex,
    SubmitToolOutputs, TextContent, Thread, ThreadMessage, ToolOutput, UploadedFile,
};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Fake remote service that records every operation and replays scripted
/// run states and replies.
#[derive(Default)]
pub struct ScriptedService {
    /// Ordered log of operations, e.g. `"delete_index:vs_1"`.
    pub ops: Mutex<Vec<String>>,
    /// Agents returned by `list_agents`.
    pub existing_agents: Mutex<Vec<AgentSummary>>,
    /// Run states replayed in order by create/get/submit; a completed run is
    /// returned once the script runs out.
    pub run_states: Mutex<VecDeque<Run>>,
    /// Messages returned by `list_messages`, most recent first.
    pub replies: Mutex<Vec<ThreadMessage>>,
    /// Tool outputs submitted back to the service.
    pub submitted: Mutex<Vec<ToolOutput>>,
    /// Operations that fail with a scripted remote error.
    pub fail_ops: Mutex<HashSet<&'static str>>,
    next_id: AtomicU64,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_runs(&self, runs: impl IntoIterator<Item = Run>) {
        self.run_states.lock().unwrap().extend(runs);
    }

    pub fn fail_on(&self, op: &'static str) {
        self.fail_ops.lock().unwrap().insert(op);
    }

    pub fn op_log(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.fail_ops.lock().unwrap().contains(op) {
            return Err(PizzaioloError::remote(op, "scripted failure"));
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", prefix, n + 1)
    }

    fn next_run(&self) -> Run {
        self.run_states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| completed_run("run_1"))
    }
}

#[async_trait]
impl AgentService for ScriptedService {
    async fn upload_document(&self, path: &Path) -> Result<UploadedFile> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.record(format!("upload_document:{}", filename));
        self.check("upload_document")?;
        Ok(UploadedFile {
            id: self.fresh_id("file"),
            filename,
            bytes: None,
            created_at: None,
        })
    }

    async fn delete_document(&self, file_id: &str) -> Result<()> {
        self.record(format!("delete_document:{}", file_id));
        self.check("delete_document")
    }

    async fn create_search_index(&self, name: &str, file_ids: &[String]) -> Result<SearchIndex> {
        self.record(format!("create_search_index:{}:{}", name, file_ids.join(",")));
        self.check("create_search_index")?;
        Ok(SearchIndex {
            id: self.fresh_id("vs"),
            name: Some(name.to_string()),
            status: IndexStatus::Completed,
            file_counts: Default::default(),
        })
    }

    async fn get_search_index(&self, index_id: &str) -> Result<SearchIndex> {
        self.record(format!("get_search_index:{}", index_id));
        self.check("get_search_index")?;
        Ok(SearchIndex {
            id: index_id.to_string(),
            name: None,
            status: IndexStatus::Completed,
            file_counts: Default::default(),
        })
    }

    async fn delete_index(&self, index_id: &str) -> Result<()> {
        self.record(format!("delete_index:{}", index_id));
        self.check("delete_index")
    }

    async fn list_agents(&self) -> Result<Vec<AgentSummary>> {
        self.record("list_agents".to_string());
        self.check("list_agents")?;
        Ok(self.existing_agents.lock().unwrap().clone())
    }

    async fn create_agent(&self, definition: &AgentDefinition) -> Result<AgentSummary> {
        self.record(format!(
            "create_agent:{}:{}",
            definition.name, definition.model
        ));
        self.check("create_agent")?;
        Ok(AgentSummary {
            id: self.fresh_id("agent"),
            name: Some(definition.name.clone()),
            model: Some(definition.model.clone()),
            created_at: None,
        })
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.record(format!("delete_agent:{}", agent_id));
        self.check("delete_agent")
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.record("create_thread".to_string());
        self.check("create_thread")?;
        Ok(Thread {
            id: self.fresh_id("thread"),
        })
    }

    async fn post_message(
        &self,
        _thread_id: &str,
        _role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage> {
        self.record(format!("post_message:{}", text));
        self.check("post_message")?;
        Ok(text_message(&self.fresh_id("msg"), MessageRole::User, text))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record("list_messages".to_string());
        self.check("list_messages")?;
        Ok(self.replies.lock().unwrap().clone())
    }

    async fn create_run(&self, _thread_id: &str, _agent_id: &str) -> Result<Run> {
        self.record("create_run".to_string());
        self.check("create_run")?;
        Ok(self.next_run())
    }

    async fn get_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.record("get_run".to_string());
        self.check("get_run")?;
        Ok(self.next_run())
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run> {
        self.record("submit_tool_outputs".to_string());
        self.check("submit_tool_outputs")?;
        self.submitted.lock().unwrap().extend(outputs);
        Ok(self.next_run())
    }
}

/// A run in the given non-action state.
pub fn run_with_status(id: &str, status: RunStatus) -> Run {
    Run {
        id: id.to_string(),
        status,
        required_action: None,
        last_error: None,
    }
}

/// A completed run.
pub fn completed_run(id: &str) -> Run {
    run_with_status(id, RunStatus::Completed)
}

/// A failed run carrying an error message.
pub fn failed_run(id: &str, message: &str) -> Run {
    Run {
        id: id.to_string(),
        status: RunStatus::Failed,
        required_action: None,
        last_error: Some(RunError {
            code: None,
            message: message.to_string(),
        }),
    }
}

/// A run waiting on the given tool calls.
pub fn requires_action_run(id: &str, calls: Vec<(&str, &str, &str)>) -> Run {
    Run {
        id: id.to_string(),
        status: RunStatus::RequiresAction,
        required_action: Some(RequiredAction {
            submit_tool_outputs: SubmitToolOutputs {
                tool_calls: calls
                    .into_iter()
                    .map(|(call_id, name, arguments)| RequiredToolCall {
                        id: call_id.to_string(),
                        function: FunctionCall {
                            name: name.to_string(),
                            arguments: arguments.to_string(),
                        },
                    })
                    .collect(),
            },
        }),
        last_error: None,
    }
}

/// A thread message with a single text segment.
pub fn text_message(id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role,
        content: vec![MessageContent::Text {
            text: TextContent {
                value: text.to_string(),
            },
        }],
        created_at: None,
    }
}

/// A thread message with no text-typed content.
pub fn textless_message(id: &str, role: MessageRole) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role,
        content: vec![MessageContent::Unsupported],
        created_at: None,
    }
}
