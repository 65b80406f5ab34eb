//! One pass from raw notification to delivery outcome.
//!
//! ```text
//! Received → Normalized → Filtered-out
//!                       | Enriched → Dispatched → Delivered
//!                                               | Failed → Notified
//! ```
//!
//! A pass owns nothing shared except read-only collaborators, so any number
//! of passes can run at once without affecting each other.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use hookmark_core::{
    is_enabled, normalize, BookmarkStore, ConfigProvider, DeliveryOutcome, FailureReason,
    Notifier, PayloadEnricher, RawNotification, SkipReason,
};

use crate::dispatcher::WebhookDispatcher;
use crate::notifier::FailureNotifier;

/// The event capture, enrichment and delivery pipeline.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn BookmarkStore>,
    config: Arc<dyn ConfigProvider>,
    notifier: FailureNotifier,
    enricher: PayloadEnricher,
    dispatcher: WebhookDispatcher,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn BookmarkStore>,
        config: Arc<dyn ConfigProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            config,
            notifier: FailureNotifier::new(notifier),
            enricher: PayloadEnricher::default(),
            dispatcher: WebhookDispatcher::new(),
        }
    }

    pub fn with_enricher(mut self, enricher: PayloadEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: WebhookDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Run one notification through the pipeline with a fresh event ID.
    pub async fn process(&self, raw: RawNotification) -> DeliveryOutcome {
        self.process_event(Uuid::now_v7(), raw).await
    }

    /// Run one notification through the pipeline.
    ///
    /// Settings are read once at the start; later changes only affect later
    /// events.
    #[instrument(
        skip(self, raw),
        fields(event_id = %event_id, event_kind = %raw.kind(), node_id = %raw.node_id())
    )]
    pub async fn process_event(&self, event_id: Uuid, raw: RawNotification) -> DeliveryOutcome {
        let start = Instant::now();
        let config = self.config.get();

        let event = normalize(raw, self.store.as_ref()).await;

        let url = match config.webhook_url() {
            Some(url) => url.to_string(),
            None => {
                warn!("Webhook URL not set");
                let reason = FailureReason::ConfigMissing;
                self.notifier.notify(&reason);
                return DeliveryOutcome::Failed(reason);
            }
        };

        if !is_enabled(event.kind, config.triggers.as_ref()) {
            debug!("Trigger for {} is disabled", event.kind);
            return DeliveryOutcome::Skipped(SkipReason::TriggerDisabled(event.kind));
        }

        let payload = self.enricher.enrich(event, self.store.as_ref()).await;
        let outcome = self.dispatcher.deliver(&url, &payload).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            DeliveryOutcome::Failed(reason) => {
                warn!(error = %reason, duration_ms, "Failed to send bookmark");
                self.notifier.notify(reason);
            }
            other => {
                info!(outcome = other.label(), duration_ms, "Event processed");
            }
        }
        outcome
    }
}
