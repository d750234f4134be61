//! Notification dispatcher — bulk token lookup, batching, and gateway
//! hand-off with per-batch failure isolation.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use newsflash_core::traits::PushTokenStore;
use newsflash_core::types::id::UserId;
use newsflash_entity::notification::PushPayload;

use crate::gateway::{PushGateway, TicketStatus};

/// Dispatches push notifications to a resolved recipient set.
///
/// Fire-and-forget from the caller's perspective: every failure is logged
/// and swallowed here, nothing propagates back into the request path that
/// committed the triggering write. There are no retries; the client's
/// next poll or reconnect is the recovery path.
#[derive(Clone)]
pub struct NotificationDispatcher {
    /// Push token store.
    tokens: Arc<dyn PushTokenStore>,
    /// Push gateway.
    gateway: Arc<dyn PushGateway>,
    /// Maximum tokens per gateway batch.
    batch_size: usize,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        tokens: Arc<dyn PushTokenStore>,
        gateway: Arc<dyn PushGateway>,
        batch_size: usize,
    ) -> Self {
        Self {
            tokens,
            gateway,
            batch_size: batch_size.max(1),
        }
    }

    /// Dispatches one payload to every active token of the recipient set.
    ///
    /// Batches are sent concurrently; one failing batch does not prevent
    /// the others from being attempted.
    pub async fn dispatch(&self, recipients: &HashSet<UserId>, payload: &PushPayload) {
        if recipients.is_empty() {
            return;
        }

        let ids: Vec<UserId> = recipients.iter().copied().collect();
        let tokens = match self.tokens.active_tokens_for(&ids).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = %e, recipients = ids.len(), "Failed to load push tokens");
                return;
            }
        };

        if tokens.is_empty() {
            debug!(
                recipients = ids.len(),
                kind = payload.metadata.kind(),
                "No active push tokens for recipient set"
            );
            return;
        }

        let batches: Vec<&[String]> = tokens.chunks(self.batch_size).collect();
        let batch_count = batches.len();

        let results = join_all(
            batches
                .into_iter()
                .map(|batch| self.send_batch(batch, payload)),
        )
        .await;

        let accepted: usize = results.iter().map(|r| r.accepted).sum();
        let rejected: usize = results.iter().map(|r| r.rejected).sum();
        let failed_batches = results.iter().filter(|r| r.batch_failed).count();

        info!(
            kind = payload.metadata.kind(),
            recipients = ids.len(),
            tokens = tokens.len(),
            batches = batch_count,
            accepted,
            rejected,
            failed_batches,
            "Push dispatch complete"
        );
    }

    /// Sends a single batch, containing its failure.
    async fn send_batch(&self, batch: &[String], payload: &PushPayload) -> BatchOutcome {
        match self.gateway.send_batch(batch, payload).await {
            Ok(tickets) => {
                let mut outcome = BatchOutcome::default();
                for ticket in &tickets {
                    match &ticket.status {
                        TicketStatus::Accepted => outcome.accepted += 1,
                        TicketStatus::Rejected { reason } => {
                            outcome.rejected += 1;
                            // Rejected tokens stay registered; only an
                            // explicit unregister deactivates a token.
                            warn!(
                                token_prefix = %token_prefix(&ticket.token),
                                reason = %reason,
                                "Push gateway rejected token"
                            );
                        }
                    }
                }
                outcome
            }
            Err(e) => {
                warn!(
                    error = %e,
                    batch_size = batch.len(),
                    "Push gateway batch failed"
                );
                BatchOutcome {
                    batch_failed: true,
                    ..Default::default()
                }
            }
        }
    }
}

/// Result of one gateway batch attempt.
#[derive(Debug, Default)]
struct BatchOutcome {
    accepted: usize,
    rejected: usize,
    batch_failed: bool,
}

/// First characters of a token, for log lines that must not leak the
/// full delivery address.
fn token_prefix(token: &str) -> String {
    token.chars().take(12).collect()
}
