use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/gpt";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint returned {0}")]
    Status(StatusCode),

    #[error("could not decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("no reply found in the response")]
    MissingReply,
}

/// Client for the `GET <endpoint>?query=` reply service.
#[derive(Debug, Clone)]
pub struct ReplyClient {
    http: Client,
    endpoint: String,
}

impl ReplyClient {
    pub fn new(endpoint: impl Into<String>) -> ReplyClient {
        ReplyClient {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the endpoint for a reply to `query`. The query is sent URL-encoded
    /// and the reply must be a non-empty `reply` string in a JSON object.
    pub async fn ask(&self, query: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body: Value = response.json().await.map_err(ApiError::Decode)?;
        debug!(%body, "response from reply endpoint");

        match body.get("reply").and_then(Value::as_str) {
            Some(reply) if !reply.is_empty() => Ok(reply.to_string()),
            _ => Err(ApiError::MissingReply),
        }
    }
}
