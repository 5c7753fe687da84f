//! HTTP client for the chat gateway.
//!
//! The gateway is the sidecar that owns the actual chat-channel session
//! (QR login, reconnects, media). We only speak a small JSON API to it:
//! text sends, document sends and typing notifications. No retries; a
//! failed send surfaces as a transport error and the engine logs it.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use balcao_config::GatewayConfig;
use balcao_core::{ChatTransport, TransportError};

use crate::ServerError;

/// [`ChatTransport`] over the gateway's HTTP API.
pub struct GatewayTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl GatewayTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServerError::Gateway(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Gateway base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json(
        &self,
        path: &str,
        recipient: &str,
        payload: serde_json::Value,
    ) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Send {
                recipient: recipient.to_string(),
                reason: format!("gateway returned {}", response.status()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for GatewayTransport {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError> {
        self.post_json("/api/send-text", to, json!({ "to": to, "body": body }))
            .await
    }

    async fn send_document(&self, to: &str, reference: &str) -> Result<(), TransportError> {
        self.post_json(
            "/api/send-document",
            to,
            json!({ "to": to, "document": reference }),
        )
        .await
    }

    async fn send_typing(&self, to: &str) -> Result<(), TransportError> {
        self.post_json("/api/send-typing", to, json!({ "to": to }))
            .await
    }
}
