//! Single-attempt HTTP delivery of enriched payloads.

use std::time::Instant;

use hookmark_core::{DeliveryOutcome, EnrichedPayload, FailureReason};
use tracing::{debug, info, warn};

/// POSTs payloads to the configured webhook.
///
/// One request per call: no retry, no queue, and no timeout beyond the
/// client's defaults.
#[derive(Debug, Clone, Default)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy, TLS roots, custom timeout).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send `payload` to `url` and classify the result.
    ///
    /// Any 2xx status is `Delivered`; any other status, or a request that
    /// never got a response, is `Failed`.
    pub async fn deliver(&self, url: &str, payload: &EnrichedPayload) -> DeliveryOutcome {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to serialize webhook payload");
                return DeliveryOutcome::Failed(FailureReason::Serialization(e.to_string()));
            }
        };

        debug!(event_kind = %payload.event, body_len = body.len(), "Posting webhook");
        let start = Instant::now();
        let result = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(
                    event_kind = %payload.event,
                    status_code = response.status().as_u16(),
                    duration_ms,
                    "Webhook sent successfully"
                );
                DeliveryOutcome::Delivered
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(
                    event_kind = %payload.event,
                    status_code = status,
                    duration_ms,
                    "Webhook endpoint rejected payload"
                );
                DeliveryOutcome::Failed(FailureReason::HttpStatus(status))
            }
            Err(e) => {
                warn!(
                    event_kind = %payload.event,
                    duration_ms,
                    error = %e,
                    "Webhook request failed"
                );
                DeliveryOutcome::Failed(FailureReason::Transport(e.to_string()))
            }
        }
    }
}
