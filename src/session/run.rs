//! Run driver: creates a remote run and processes it to completion.

use crate::config::RunSettings;
use crate::error::{PizzaioloError, Result};
use crate::remote::{AgentService, Run, RunStatus, ToolOutput};
use crate::tools::{parse_tool_call, ToolContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Drives a remote run to completion: polls status, dispatches required
/// tool calls through the local registry, and submits their outputs.
pub struct RunDriver {
    service: Arc<dyn AgentService>,
    tools: ToolContext,
    poll_interval: Duration,
    max_polls: u32,
}

impl RunDriver {
    pub fn new(service: Arc<dyn AgentService>, tools: ToolContext, settings: &RunSettings) -> Self {
        Self {
            service,
            tools,
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_polls: settings.max_polls,
        }
    }

    /// Create a run and process it until it completes.
    ///
    /// A failed, cancelled, or expired run becomes an error; a run that
    /// stays in flight past the poll budget, or keeps demanding tool calls
    /// past it, is abandoned instead of blocking forever.
    pub async fn create_and_process(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let mut run = self.service.create_run(thread_id, agent_id).await?;
        let mut polls: u32 = 0;
        let mut tool_cycles: u32 = 0;

        loop {
            match run.status {
                RunStatus::Completed => return Ok(run),

                RunStatus::RequiresAction => {
                    tool_cycles += 1;
                    if tool_cycles > self.max_polls {
                        return Err(PizzaioloError::Agent(format!(
                            "Run {} exceeded {} tool-call cycles",
                            run.id, self.max_polls
                        )));
                    }
                    let outputs = self.collect_tool_outputs(&run)?;
                    run = self
                        .service
                        .submit_tool_outputs(thread_id, &run.id, outputs)
                        .await?;
                }

                RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired => {
                    let detail = run
                        .last_error
                        .as_ref()
                        .map(|e| e.message.clone())
                        .unwrap_or_else(|| format!("run ended with status {:?}", run.status));
                    return Err(PizzaioloError::Agent(detail));
                }

                RunStatus::Queued
                | RunStatus::InProgress
                | RunStatus::Cancelling
                | RunStatus::Unknown => {
                    polls += 1;
                    if polls > self.max_polls {
                        return Err(PizzaioloError::Agent(format!(
                            "Run {} did not finish within {} polls",
                            run.id, self.max_polls
                        )));
                    }
                    debug!("Run {} status {:?}, poll {}", run.id, run.status, polls);
                    tokio::time::sleep(self.poll_interval).await;
                    run = self.service.get_run(thread_id, &run.id).await?;
                }
            }
        }
    }

    /// Dispatch each required tool call. Parse or execution failures are
    /// reported back to the run as a tool error string, never as a local
    /// crash.
    fn collect_tool_outputs(&self, run: &Run) -> Result<Vec<ToolOutput>> {
        let action = run.required_action.as_ref().ok_or_else(|| {
            PizzaioloError::Agent(format!(
                "Run {} requires action but provided no tool calls",
                run.id
            ))
        })?;

        let mut outputs = Vec::new();
        for call in &action.submit_tool_outputs.tool_calls {
            let name = &call.function.name;
            let arguments = &call.function.arguments;

            info!("Run calling tool: {} with args: {}", name, arguments);

            let output = match parse_tool_call(name, arguments) {
                Ok(tool) => match self.tools.execute(&tool) {
                    Ok(result) => result,
                    Err(e) => format!("Tool error: {}", e),
                },
                Err(e) => format!("Tool error: {}", e),
            };

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }
        Ok(outputs)
    }
}
