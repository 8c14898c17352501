//! HTTP implementation of the agent service client.

use super::models::{
    AgentDefinition, AgentSummary, DeletionStatus, ListResponse, MessageRole, Run, SearchIndex,
    Thread, ThreadMessage, ToolOutput, UploadedFile,
};
use super::AgentService;
use crate::config::{Settings, API_KEY_ENV};
use crate::error::{PizzaioloError, Result};
use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Reqwest-backed client for the hosted agent service.
///
/// Every request carries a bearer key and the service's `api-version` query
/// parameter, runs under a per-request timeout, and retries transient
/// failures with bounded exponential backoff.
pub struct HttpAgentService {
    http: reqwest::Client,
    base: String,
    api_version: String,
    api_key: String,
    max_retries: u32,
    retry_initial_delay: Duration,
}

impl HttpAgentService {
    /// Build a client from settings and ambient environment credentials.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoint = settings.endpoint()?;
        url::Url::parse(&endpoint).map_err(|e| {
            PizzaioloError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e))
        })?;

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                PizzaioloError::Config(format!(
                    "{} not set. Set it with: export {}='...'",
                    API_KEY_ENV, API_KEY_ENV
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.remote.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
            api_version: settings.remote.api_version.clone(),
            api_key,
            max_retries: settings.remote.max_retries,
            retry_initial_delay: Duration::from_millis(settings.remote.retry_initial_delay_ms),
        })
    }

    fn url(&self, path: &str) -> String {
        build_url(&self.base, path, &self.api_version)
    }

    /// Send a request, retrying transient failures (connect/timeout errors,
    /// HTTP 429 and 5xx) with exponentially increasing delays.
    async fn send_with_retry<F>(
        &self,
        operation: &'static str,
        build: F,
    ) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            debug!("{}: attempt {}", operation, attempt + 1);

            let outcome = build()
                .bearer_auth(&self.api_key)
                .send()
                .await;

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let retryable = status.is_server_error()
                        || status == reqwest::StatusCode::TOO_MANY_REQUESTS;
                    if retryable && attempt < self.max_retries {
                        warn!("{}: HTTP {} - retrying", operation, status);
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        return Err(PizzaioloError::remote(
                            operation,
                            extract_error_message(status, &body),
                        ));
                    }
                }
                Err(e) => {
                    let retryable = e.is_connect() || e.is_timeout();
                    if retryable && attempt < self.max_retries {
                        warn!("{}: {} - retrying", operation, e);
                    } else {
                        return Err(PizzaioloError::remote(operation, e.to_string()));
                    }
                }
            }

            let delay = self.retry_initial_delay * 2u32.pow(attempt);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| PizzaioloError::remote(operation, format!("invalid response: {}", e)))
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn upload_document(&self, path: &Path) -> Result<UploadedFile> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let bytes = tokio::fs::read(path).await?;

        let url = self.url("files");
        let response = self
            .send_with_retry("upload_document", || {
                let part = multipart::Part::bytes(bytes.clone()).file_name(filename.clone());
                let form = multipart::Form::new()
                    .text("purpose", "assistants")
                    .part("file", part);
                self.http.post(&url).multipart(form)
            })
            .await?;
        self.decode("upload_document", response).await
    }

    async fn delete_document(&self, file_id: &str) -> Result<()> {
        let url = self.url(&format!("files/{}", file_id));
        let response = self
            .send_with_retry("delete_document", || self.http.delete(&url))
            .await?;
        let _: DeletionStatus = self.decode("delete_document", response).await?;
        Ok(())
    }

    async fn create_search_index(&self, name: &str, file_ids: &[String]) -> Result<SearchIndex> {
        let url = self.url("vector_stores");
        let body = serde_json::json!({ "name": name, "file_ids": file_ids });
        let response = self
            .send_with_retry("create_search_index", || {
                self.http.post(&url).json(&body)
            })
            .await?;
        self.decode("create_search_index", response).await
    }

    async fn get_search_index(&self, index_id: &str) -> Result<SearchIndex> {
        let url = self.url(&format!("vector_stores/{}", index_id));
        let response = self
            .send_with_retry("get_search_index", || self.http.get(&url))
            .await?;
        self.decode("get_search_index", response).await
    }

    async fn delete_index(&self, index_id: &str) -> Result<()> {
        let url = self.url(&format!("vector_stores/{}", index_id));
        let response = self
            .send_with_retry("delete_index", || self.http.delete(&url))
            .await?;
        let _: DeletionStatus = self.decode("delete_index", response).await?;
        Ok(())
    }

    async fn list_agents(&self) -> Result<Vec<AgentSummary>> {
        let url = self.url("assistants?limit=100");
        let response = self
            .send_with_retry("list_agents", || self.http.get(&url))
            .await?;
        let list: ListResponse<AgentSummary> = self.decode("list_agents", response).await?;
        Ok(list.data)
    }

    async fn create_agent(&self, definition: &AgentDefinition) -> Result<AgentSummary> {
        let url = self.url("assistants");
        let response = self
            .send_with_retry("create_agent", || self.http.post(&url).json(definition))
            .await?;
        self.decode("create_agent", response).await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        let url = self.url(&format!("assistants/{}", agent_id));
        let response = self
            .send_with_retry("delete_agent", || self.http.delete(&url))
            .await?;
        let _: DeletionStatus = self.decode("delete_agent", response).await?;
        Ok(())
    }

    async fn create_thread(&self) -> Result<Thread> {
        let url = self.url("threads");
        let body = serde_json::json!({});
        let response = self
            .send_with_retry("create_thread", || self.http.post(&url).json(&body))
            .await?;
        self.decode("create_thread", response).await
    }

    async fn post_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage> {
        let url = self.url(&format!("threads/{}/messages", thread_id));
        let body = serde_json::json!({ "role": role, "content": text });
        let response = self
            .send_with_retry("post_message", || self.http.post(&url).json(&body))
            .await?;
        self.decode("post_message", response).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        // order=desc: most recent first.
        let url = self.url(&format!("threads/{}/messages?order=desc", thread_id));
        let response = self
            .send_with_retry("list_messages", || self.http.get(&url))
            .await?;
        let list: ListResponse<ThreadMessage> = self.decode("list_messages", response).await?;
        Ok(list.data)
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let url = self.url(&format!("threads/{}/runs", thread_id));
        let body = serde_json::json!({ "assistant_id": agent_id });
        let response = self
            .send_with_retry("create_run", || self.http.post(&url).json(&body))
            .await?;
        self.decode("create_run", response).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let url = self.url(&format!("threads/{}/runs/{}", thread_id, run_id));
        let response = self
            .send_with_retry("get_run", || self.http.get(&url))
            .await?;
        self.decode("get_run", response).await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run> {
        let url = self.url(&format!(
            "threads/{}/runs/{}/submit_tool_outputs",
            thread_id, run_id
        ));
        let body = serde_json::json!({ "tool_outputs": outputs });
        let response = self
            .send_with_retry("submit_tool_outputs", || self.http.post(&url).json(&body))
            .await?;
        self.decode("submit_tool_outputs", response).await
    }
}

/// Join the base endpoint, resource path, and api-version query parameter.
fn build_url(base: &str, path: &str, api_version: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!(
        "{}/{}{}api-version={}",
        base.trim_end_matches('/'),
        path,
        separator,
        api_version
    )
}

/// Best-effort extraction of the service's error message from a failed
/// response body.
fn extract_error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ServiceError {
        error: ServiceErrorBody,
    }
    #[derive(serde::Deserialize)]
    struct ServiceErrorBody {
        message: String,
    }

    match serde_json::from_str::<ServiceError>(body) {
        Ok(parsed) => format!("HTTP {}: {}", status, parsed.error.message),
        Err(_) if !body.is_empty() => format!("HTTP {}: {}", status, body),
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_api_version() {
        assert_eq!(
            build_url("https://example.com/api/projects/p", "threads", "v1"),
            "https://example.com/api/projects/p/threads?api-version=v1"
        );
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        assert_eq!(
            build_url("https://example.com/", "files", "v1"),
            "https://example.com/files?api-version=v1"
        );
    }

    #[test]
    fn test_build_url_with_existing_query() {
        assert_eq!(
            build_url("https://example.com", "assistants?limit=100", "v1"),
            "https://example.com/assistants?limit=100&api-version=v1"
        );
    }

    #[test]
    fn test_extract_error_message_from_service_body() {
        let message = extract_error_message(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"error": {"code": "not_found", "message": "No thread found"}}"#,
        );
        assert_eq!(message, "HTTP 404 Not Found: No thread found");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_body() {
        let message = extract_error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream died");
        assert_eq!(message, "HTTP 502 Bad Gateway: upstream died");
    }

    #[test]
    fn test_extract_error_message_empty_body() {
        let message = extract_error_message(reqwest::StatusCode::UNAUTHORIZED, "");
        assert_eq!(message, "HTTP 401 Unauthorized");
    }
}
