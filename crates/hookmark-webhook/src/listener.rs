//! Event bus subscriber that feeds the pipeline.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use hookmark_core::{EventBus, NotificationEnvelope};

use crate::pipeline::Pipeline;

/// Spawn the listener on the current runtime.
///
/// The subscription is taken before this returns, so notifications emitted
/// right after the call are not missed.
pub fn spawn_listener(event_bus: &EventBus, pipeline: Pipeline) -> JoinHandle<()> {
    let rx = event_bus.subscribe();
    tokio::spawn(run_listener(rx, pipeline))
}

/// Receive notifications until the bus closes, running each one through the
/// pipeline in its own task.
///
/// Tasks are not awaited: a slow or failing delivery never holds up the
/// next notification.
pub async fn run_listener(mut rx: Receiver<NotificationEnvelope>, pipeline: Pipeline) {
    info!("Webhook listener started");
    loop {
        match rx.recv().await {
            Ok(envelope) => {
                let pipeline = pipeline.clone();
                tokio::spawn(async move {
                    pipeline
                        .process_event(envelope.event_id, envelope.notification)
                        .await;
                });
            }
            Err(RecvError::Lagged(n)) => {
                warn!(missed = n, "Webhook listener lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
    info!("Webhook listener stopped");
}
