//! Interactive chat command: provision, converse, tear down.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::remote::HttpAgentService;
use crate::session::{provision, run_loop, teardown, ChatSession, RunDriver};
use crate::tools::ToolContext;
use console::style;
use std::io;
use std::sync::Arc;
use tracing::{debug, info};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pizzaiolo doctor' for detailed diagnostics.");
        return Err(e);
    }

    if let Some(mcp_url) = settings.mcp_server_url() {
        debug!("Secondary MCP server configured: {}", mcp_url);
    }

    let service: Arc<HttpAgentService> = Arc::new(HttpAgentService::from_settings(&settings)?);

    let resources = provision(service.as_ref(), &settings, model.as_deref()).await?;
    info!(
        "Session ready: agent {} on thread {}",
        resources.agent_id, resources.thread_id
    );

    let driver = RunDriver::new(service.clone(), ToolContext::new(), &settings.run);
    let session = ChatSession::new(
        service.clone(),
        driver,
        resources.thread_id.clone(),
        resources.agent_id.clone(),
    );

    println!("\n{}", style(&settings.agent.name).bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let loop_result = run_loop(stdin.lock(), &session).await;

    // Teardown runs exactly once per session, even when the loop errored.
    teardown(service.as_ref(), &resources).await?;

    let stats = loop_result?;
    debug!("Chat finished after {} message(s)", stats.dispatched);
    Ok(())
}
