//! HTTP push gateway client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use newsflash_core::config::PushConfig;
use newsflash_core::error::AppError;
use newsflash_core::result::AppResult;
use newsflash_entity::notification::PushPayload;

use super::{PushGateway, PushTicket, TicketStatus};

/// One receipt entry in the gateway response, index-aligned with the
/// submitted messages.
#[derive(Debug, Deserialize)]
struct GatewayReceipt {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Gateway response envelope.
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    data: Vec<GatewayReceipt>,
}

/// Push gateway client speaking the provider's batch HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPushGateway {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Gateway configuration.
    config: PushConfig,
}

impl HttpPushGateway {
    /// Creates a new gateway client from configuration.
    pub fn new(config: PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> AppResult<Vec<PushTicket>> {
        let messages: Vec<serde_json::Value> = tokens
            .iter()
            .map(|token| {
                serde_json::json!({
                    "to": token,
                    "title": payload.title,
                    "body": payload.body,
                    "data": payload.metadata,
                    "badge": payload.badge,
                    "priority": "high",
                })
            })
            .collect();

        let mut request = self.client.post(&self.config.endpoint).json(&messages);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                newsflash_core::error::ErrorKind::ExternalService,
                format!("Push gateway request failed: {e}"),
                e,
            )
        })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Push gateway returned HTTP {}",
                response.status()
            )));
        }

        let body: GatewayResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                newsflash_core::error::ErrorKind::ExternalService,
                format!("Failed to parse gateway response: {e}"),
                e,
            )
        })?;

        debug!(
            batch_size = tokens.len(),
            receipts = body.data.len(),
            "Push gateway batch accepted"
        );

        // Receipts are index-aligned; a short response leaves the tail
        // accepted, which errs on the side of not flagging live tokens.
        let tickets = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let status = match body.data.get(i) {
                    Some(receipt) if receipt.status != "ok" => TicketStatus::Rejected {
                        reason: receipt
                            .message
                            .clone()
                            .unwrap_or_else(|| receipt.status.clone()),
                    },
                    _ => TicketStatus::Accepted,
                };
                PushTicket {
                    token: token.clone(),
                    status,
                }
            })
            .collect();

        Ok(tickets)
    }
}
