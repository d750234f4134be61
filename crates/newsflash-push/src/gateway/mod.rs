//! Push gateway interface.

pub mod http;

use async_trait::async_trait;

use newsflash_core::result::AppResult;
use newsflash_entity::notification::PushPayload;

pub use http::HttpPushGateway;

/// Per-token outcome of a gateway batch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTicket {
    /// The token this ticket refers to.
    pub token: String,
    /// Accept/reject status.
    pub status: TicketStatus,
}

/// Gateway verdict for a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    /// The gateway accepted the notification for delivery.
    Accepted,
    /// The gateway rejected the token.
    Rejected {
        /// Gateway-reported reason.
        reason: String,
    },
}

/// Outbound push gateway.
///
/// One call per batch; the ticket list is index-aligned with the token
/// list. A transport-level failure errors the whole batch, a malformed
/// token rejects only its own ticket.
#[async_trait]
pub trait PushGateway: Send + Sync + 'static {
    /// Sends one notification payload to a batch of tokens.
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> AppResult<Vec<PushTicket>>;
}
