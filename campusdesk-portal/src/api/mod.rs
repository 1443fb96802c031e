//! REST backend access
//!
//! Every backend endpoint answers with a `{ success, data?, message? }`
//! envelope; [`ApiClient`] unwraps it into `CampusResult`.

use campusdesk_core::{auth_error, ApiConfig, CampusError, CampusResult, ErrorContext};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod entities;
pub mod service;

pub use entities::*;
pub use service::EntityService;

/// Response envelope shared by all backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// HTTP client bound to the backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> CampusResult<Self> {
        url::Url::parse(&config.base_url).map_err(|e| CampusError::Config {
            message: format!("Invalid backend URL '{}': {}", config.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client").with_operation("create_client"),
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CampusError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("api_client").with_operation("create_client"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the bearer token when there is one
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "Backend request");

        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send `request` and unwrap the envelope's `data`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> CampusResult<Option<T>> {
        let response = request.send().await.map_err(|e| {
            let message = format!("Request to backend failed during {}: {}", operation, e);
            CampusError::network(message, e, "api_client")
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let message = format!("Failed to read backend response during {}: {}", operation, e);
            CampusError::network(message, e, "api_client")
        })?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(auth_error!(
                envelope_message(&body).unwrap_or_else(|| "Session expired".to_string()),
                "api_client"
            ));
        }

        if !status.is_success() {
            let message = envelope_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            return Err(CampusError::Api {
                message,
                status: Some(status.as_u16()),
                context: ErrorContext::new("api_client")
                    .with_operation(operation)
                    .with_suggestion(match status.as_u16() {
                        403 => "Your role may not allow this operation",
                        404 => "The record may have been deleted; refresh the list",
                        _ => "Check the backend status and try again",
                    }),
            });
        }

        // 204 No Content
        if body.trim().is_empty() {
            debug!(%status, operation, "Empty response body");
            return Ok(None);
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(CampusError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("{} was rejected by the backend", operation)),
                status: Some(status.as_u16()),
                context: ErrorContext::new("api_client").with_operation(operation),
            });
        }

        Ok(envelope.data)
    }
}

/// Best-effort extraction of `message` from an error body
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
}
