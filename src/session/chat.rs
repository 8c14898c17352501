//! Interactive chat loop against the provisioned agent.

use crate::cli::Output;
use crate::error::Result;
use crate::remote::{AgentService, MessageRole};
use crate::session::run::RunDriver;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// What the loop should do with a line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopAction {
    /// Terminate the loop and proceed to teardown.
    Exit,
    /// Ignore the line and prompt again.
    Skip,
    /// Dispatch the text to the agent.
    Dispatch(String),
}

/// Classify a line of user input. `exit` and `quit` terminate in any letter
/// casing; blank lines are skipped.
pub fn classify_input(line: &str) -> LoopAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LoopAction::Skip
    } else if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        LoopAction::Exit
    } else {
        LoopAction::Dispatch(trimmed.to_string())
    }
}

/// One conversation turn counterpart on the client side: post the message,
/// drive the run, read back the newest reply.
pub struct ChatSession {
    service: Arc<dyn AgentService>,
    driver: RunDriver,
    thread_id: String,
    agent_id: String,
}

impl ChatSession {
    pub fn new(
        service: Arc<dyn AgentService>,
        driver: RunDriver,
        thread_id: String,
        agent_id: String,
    ) -> Self {
        Self {
            service,
            driver,
            thread_id,
            agent_id,
        }
    }

    /// Send user text to the agent and return the reply: the first
    /// text-typed segment of the thread's most recent message, or the empty
    /// string if the newest message carries no text.
    pub async fn send(&self, text: &str) -> Result<String> {
        self.service
            .post_message(&self.thread_id, MessageRole::User, text)
            .await?;

        let run = self
            .driver
            .create_and_process(&self.thread_id, &self.agent_id)
            .await?;
        debug!("Run {} finished with status {:?}", run.id, run.status);

        let messages = self.service.list_messages(&self.thread_id).await?;
        Ok(messages
            .first()
            .and_then(|message| message.first_text())
            .unwrap_or_default()
            .to_string())
    }
}

/// Counters for a finished loop.
#[derive(Debug, Default)]
pub struct LoopStats {
    /// Messages dispatched to the agent.
    pub dispatched: usize,
}

/// Drive the read-eval-print loop until the user exits or input ends.
///
/// Generic over the reader so tests can feed scripted input.
pub async fn run_loop<R: BufRead>(mut input: R, session: &ChatSession) -> Result<LoopStats> {
    let mut stats = LoopStats::default();

    loop {
        print!("{} ", style("You:").green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF behaves like an explicit exit.
            println!();
            break;
        }

        match classify_input(&line) {
            LoopAction::Exit => break,
            LoopAction::Skip => continue,
            LoopAction::Dispatch(text) => {
                let spinner = Output::spinner("Thinking...");
                let result = session.send(&text).await;
                spinner.finish_and_clear();

                let reply = result?;
                stats.dispatched += 1;
                println!("{} {}", style("Agent:").cyan().bold(), reply);
            }
        }
    }

    Ok(stats)
}
