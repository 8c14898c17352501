//! Agent provisioning and teardown.
//!
//! Provisioning mirrors the service's expected lifecycle: upload reference
//! documents, build a vector store over them, replace any same-named agent,
//! register the agent with its tools, and open the conversation thread.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::{PizzaioloError, Result};
use crate::remote::{
    AgentDefinition, AgentService, FileSearchResources, IndexStatus, SearchIndex, ToolResources,
};
use crate::tools::tool_definitions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Personality and scope instructions for the pizza agent.
const AGENT_INSTRUCTIONS: &str = r#"You are an agent that helps customers order pizzas from Contoso pizza.
You have a Gen-alpha personality, so you are friendly and helpful, but also a bit cheeky.
You can list all available Contoso Pizza stores and answer questions about them.
You help customers order a pizza of their chosen size, crust, and toppings.
You ask for a store location before confirming an order.
You can take orders for pizza that will appear on the in-room dashboard.
You can provide the status of the customer's pizza order(s).
You can cancel an order after it has been placed, if the cancellation is requested quickly enough.
You don't like pineapple on pizzas, but you will help a customer order a pizza with pineapple ... with some snark.
Make sure you know the customer's name before placing an order on their behalf.
You can use the calculate_pizza_needed tool to help customers determine how many pizzas they need based on the number of people.
You can't do anything except help customers order pizzas and give information about Contoso Pizza. You will gently deflect any other questions."#;

/// Handles for everything provisioned on the remote service.
#[derive(Debug, Clone)]
pub struct ProvisionedAgent {
    pub file_ids: Vec<String>,
    pub vector_store_id: String,
    pub agent_id: String,
    pub thread_id: String,
}

/// Provision the agent: upload documents, build the search index, replace
/// any existing agent with the configured name, register the agent, and
/// open a conversation thread.
pub async fn provision(
    service: &dyn AgentService,
    settings: &Settings,
    model_override: Option<&str>,
) -> Result<ProvisionedAgent> {
    let documents = gather_documents(&settings.docs_dir())?;

    let mut file_ids = Vec::new();
    for path in &documents {
        let file = service.upload_document(path).await?;
        Output::info(&format!("Uploaded file: {}", file.filename));
        file_ids.push(file.id);
    }

    let index = create_index_and_wait(service, settings, &file_ids).await?;
    Output::info(&format!("Created vector store, ID: {}", index.id));

    // Replace any existing agents registered under the same name.
    for existing in service.list_agents().await? {
        if existing.name.as_deref() == Some(settings.agent.name.as_str()) {
            service.delete_agent(&existing.id).await?;
            Output::info(&format!(
                "Deleted existing agent: {} (created {})",
                existing.id,
                existing.created_display()
            ));
        }
    }

    let model = model_override.unwrap_or(&settings.agent.model);
    let definition = AgentDefinition {
        model: model.to_string(),
        name: settings.agent.name.clone(),
        instructions: AGENT_INSTRUCTIONS.to_string(),
        tools: tool_definitions(),
        tool_resources: Some(ToolResources {
            file_search: Some(FileSearchResources {
                vector_store_ids: vec![index.id.clone()],
            }),
        }),
    };
    let agent = service.create_agent(&definition).await?;
    Output::info(&format!("Created agent, ID: {}", agent.id));
    info!("Provisioned agent {} on model {}", agent.id, model);

    let thread = service.create_thread().await?;
    Output::info(&format!("Created thread, ID: {}", thread.id));

    Ok(ProvisionedAgent {
        file_ids,
        vector_store_id: index.id,
        agent_id: agent.id,
        thread_id: thread.id,
    })
}

/// Release all provisioned resources: the index first, then the uploaded
/// documents, then the agent.
///
/// Each deletion is attempted even if an earlier one fails, so a transient
/// remote error cannot leak the remaining resources.
pub async fn teardown(service: &dyn AgentService, resources: &ProvisionedAgent) -> Result<()> {
    if let Err(e) = service.delete_index(&resources.vector_store_id).await {
        warn!("Failed to delete vector store {}: {}", resources.vector_store_id, e);
        Output::warning(&format!("Could not delete vector store: {}", e));
    }

    for file_id in &resources.file_ids {
        if let Err(e) = service.delete_document(file_id).await {
            warn!("Failed to delete file {}: {}", file_id, e);
            Output::warning(&format!("Could not delete file {}: {}", file_id, e));
        }
    }

    match service.delete_agent(&resources.agent_id).await {
        Ok(()) => Output::info("Deleted agent"),
        Err(e) => {
            warn!("Failed to delete agent {}: {}", resources.agent_id, e);
            Output::warning(&format!("Could not delete agent: {}", e));
        }
    }

    Ok(())
}

/// Create the vector store and poll until indexing finishes.
async fn create_index_and_wait(
    service: &dyn AgentService,
    settings: &Settings,
    file_ids: &[String],
) -> Result<SearchIndex> {
    let mut index = service
        .create_search_index(&settings.agent.vector_store_name, file_ids)
        .await?;

    let mut polls: u32 = 0;
    while index.status == IndexStatus::InProgress {
        polls += 1;
        if polls > settings.run.max_polls {
            return Err(PizzaioloError::Agent(format!(
                "Vector store {} did not finish indexing within {} polls",
                index.id, settings.run.max_polls
            )));
        }
        debug!("Vector store {} still indexing, poll {}", index.id, polls);
        tokio::time::sleep(Duration::from_millis(settings.run.poll_interval_ms)).await;
        index = service.get_search_index(&index.id).await?;
    }

    match index.status {
        IndexStatus::Completed => Ok(index),
        other => Err(PizzaioloError::Agent(format!(
            "Vector store {} ended in state {:?}",
            index.id, other
        ))),
    }
}

/// Collect the regular files under the documents directory, sorted by path
/// for a stable upload order.
fn gather_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PizzaioloError::Config(format!(
            "Documents directory not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PizzaioloError::Config(format!(
            "No reference documents found in {}",
            dir.display()
        )));
    }
    Ok(files)
}
