//! Creatomate render client
//!
//! Submits render jobs by wrapping caller-supplied scene data into the
//! configured template and relaying whatever the service answers, status
//! included. The modification payload belongs to the third-party template
//! contract and is never inspected here.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::RenderConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render request failed: {0}")]
    RequestFailed(String),

    #[error("failed to parse render response: {0}")]
    ParseError(String),
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    template_id: &'a str,
    modifications: &'a serde_json::Value,
}

/// Upstream reply, relayed to the caller as-is.
#[derive(Debug)]
pub struct RenderOutcome {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

pub struct RenderClient {
    client: Client,
    api_url: String,
    api_key: String,
    template_id: String,
}

impl RenderClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            template_id: template_id.into(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.template_id.clone(),
        )
    }

    /// Submit a render, passing `scene_data` through as template
    /// modifications. Upstream error bodies are relayed like successes;
    /// only transport faults surface as [`RenderError`].
    pub async fn render(&self, scene_data: &serde_json::Value) -> Result<RenderOutcome, RenderError> {
        info!(template_id = %self.template_id, "Dispatching render request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&RenderRequest {
                template_id: &self.template_id,
                modifications: scene_data,
            })
            .send()
            .await
            .map_err(|e| RenderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .json()
            .await
            .map_err(|e| RenderError::ParseError(e.to_string()))?;

        Ok(RenderOutcome { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_render_forwards_template_and_scene_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/renders")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({
                "template_id": "tmpl-1",
                "modifications": {"Text.text": "automated video"}
            })))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"render-1","status":"planned"}]"#)
            .create_async()
            .await;

        let client = RenderClient::new(format!("{}/v1/renders", server.url()), "test-key", "tmpl-1");
        let outcome = client
            .render(&json!({"Text.text": "automated video"}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.status, StatusCode::ACCEPTED);
        assert_eq!(outcome.body, json!([{"id": "render-1", "status": "planned"}]));
    }

    #[tokio::test]
    async fn test_render_relays_upstream_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/renders")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid api key"}"#)
            .create_async()
            .await;

        let client = RenderClient::new(format!("{}/v1/renders", server.url()), "bad-key", "tmpl-1");
        let outcome = client.render(&json!({})).await.unwrap();

        assert_eq!(outcome.status, StatusCode::UNAUTHORIZED);
        assert_eq!(outcome.body, json!({"error": "invalid api key"}));
    }

    #[tokio::test]
    async fn test_render_connection_failure() {
        // Nothing listens on port 1.
        let client = RenderClient::new("http://127.0.0.1:1/v1/renders", "key", "tmpl");
        let err = client.render(&json!({})).await.unwrap_err();
        assert!(matches!(err, RenderError::RequestFailed(_)));
    }
}
