//! End-to-end pipeline behavior against a mock webhook endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use hookmark_core::defaults::EVENT_BUS_CAPACITY_TEST;
use hookmark_core::{
    AncestorResolver, BookmarkNode, BookmarkStore, ChangeInfo, DeliveryOutcome, Error, EventBus,
    EventKind, FailureReason, PayloadEnricher, RawNotification, RemoveInfo, Result, SkipReason,
    WebhookConfig,
};
use hookmark_store::{
    CreateBookmarkRequest, MemoryBookmarkStore, MoveBookmarkRequest, SettingsStore,
    UpdateBookmarkRequest,
};
use hookmark_webhook::{NotificationLog, Pipeline, WebhookDispatcher};

// =============================================================================
// FIXTURES
// =============================================================================

struct Harness {
    store: Arc<MemoryBookmarkStore>,
    settings: Arc<SettingsStore>,
    log: Arc<NotificationLog>,
    bus: Arc<EventBus>,
    pipeline: Pipeline,
}

impl Harness {
    fn new(config: WebhookConfig) -> Self {
        let bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY_TEST));
        let store = Arc::new(MemoryBookmarkStore::new("root").with_event_bus(bus.clone()));
        Self::with_store(config, bus, store.clone(), store)
    }

    fn with_store(
        config: WebhookConfig,
        bus: Arc<EventBus>,
        store: Arc<MemoryBookmarkStore>,
        lookup: Arc<dyn BookmarkStore>,
    ) -> Self {
        let settings = Arc::new(SettingsStore::in_memory(config));
        let log = Arc::new(NotificationLog::default());
        let pipeline = Pipeline::new(lookup, settings.clone(), log.clone());
        Self {
            store,
            settings,
            log,
            bus,
            pipeline,
        }
    }

    /// Build root → Work → Q1 and return Q1's ID.
    async fn work_q1(&self) -> String {
        let work = self.store.create(folder("0", "Work")).await.unwrap();
        let q1 = self.store.create(folder(&work.id, "Q1")).await.unwrap();
        q1.id
    }
}

fn folder(parent: &str, title: &str) -> CreateBookmarkRequest {
    CreateBookmarkRequest {
        parent_id: parent.to_string(),
        index: None,
        title: title.to_string(),
        url: None,
    }
}

fn bookmark(parent: &str, title: &str, url: &str) -> CreateBookmarkRequest {
    CreateBookmarkRequest {
        parent_id: parent.to_string(),
        index: None,
        title: title.to_string(),
        url: Some(url.to_string()),
    }
}

fn one_of_each_kind() -> Vec<RawNotification> {
    vec![
        RawNotification::Created {
            id: "10".to_string(),
            info: hookmark_core::CreateInfo {
                parent_id: None,
                index: None,
                title: "A".to_string(),
                url: Some("https://a.example".to_string()),
                date_added: None,
            },
        },
        RawNotification::Updated {
            id: "10".to_string(),
            info: ChangeInfo {
                title: "A2".to_string(),
                url: Some("https://a.example".to_string()),
            },
        },
        RawNotification::Deleted {
            id: "10".to_string(),
            info: RemoveInfo {
                parent_id: None,
                index: 0,
            },
        },
        RawNotification::Moved {
            id: "10".to_string(),
            info: hookmark_core::MoveInfo {
                parent_id: "0".to_string(),
                index: 0,
                old_parent_id: "0".to_string(),
                old_index: 1,
            },
        },
    ]
}

fn received_bodies(requests: &[Request]) -> Vec<Value> {
    requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Wraps the memory store and fails lookups of chosen IDs.
struct FlakyStore {
    inner: Arc<MemoryBookmarkStore>,
    failing: Vec<String>,
}

#[async_trait]
impl BookmarkStore for FlakyStore {
    async fn get(&self, id: &str) -> Result<Option<BookmarkNode>> {
        if self.failing.iter().any(|f| f == id) {
            return Err(Error::Lookup(format!("store timed out on {}", id)));
        }
        self.inner.get(id).await
    }
}

// =============================================================================
// TRIGGERS
// =============================================================================

#[tokio::test]
async fn test_disabled_triggers_issue_no_http_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for kind in EventKind::ALL {
        let mut config = WebhookConfig::new(server.uri());
        for other in EventKind::ALL {
            config = config.with_trigger(other, other != kind);
        }
        let h = Harness::new(config);

        let raw = one_of_each_kind()
            .into_iter()
            .find(|r| r.kind() == kind)
            .unwrap();
        let outcome = h.pipeline.process(raw).await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Skipped(SkipReason::TriggerDisabled(kind))
        );
        assert!(h.log.is_empty(), "disabled {} must not notify", kind);
    }
}

#[tokio::test]
async fn test_absent_triggers_enable_all_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    for raw in one_of_each_kind() {
        assert_eq!(h.pipeline.process(raw).await, DeliveryOutcome::Delivered);
    }

    let events: Vec<_> = received_bodies(&server.received_requests().await.unwrap())
        .into_iter()
        .map(|b| b["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, ["created", "updated", "deleted", "moved"]);
}

#[tokio::test]
async fn test_trigger_map_missing_kind_is_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = WebhookConfig::new(server.uri()).with_trigger(EventKind::Created, true);
    let h = Harness::new(config);

    let mut outcomes = Vec::new();
    for raw in one_of_each_kind() {
        outcomes.push(h.pipeline.process(raw).await);
    }

    assert_eq!(outcomes[0], DeliveryOutcome::Delivered);
    assert!(outcomes[1..]
        .iter()
        .all(|o| matches!(o, DeliveryOutcome::Skipped(_))));
}

// =============================================================================
// PAYLOAD SHAPE
// =============================================================================

#[tokio::test]
async fn test_created_bookmark_carries_folder_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let q1 = h.work_q1().await;
    let mut rx = h.bus.subscribe();
    let plan = h
        .store
        .create(bookmark(&q1, "Plan", "https://plan.example"))
        .await
        .unwrap();

    let envelope = rx.recv().await.unwrap();
    let outcome = h.pipeline.process(envelope.notification).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered);

    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["event"], "created");
    assert_eq!(body["type"], "data");
    assert_eq!(body["data"]["id"], plan.id.as_str());
    assert_eq!(body["data"]["title"], "Plan");
    assert_eq!(body["data"]["url"], "https://plan.example");
    assert_eq!(body["data"]["parentId"], q1.as_str());
    assert_eq!(body["data"]["folderPath"], "root/Work/Q1");
    assert_eq!(body["data"]["parentFolder"], "Q1");
}

#[tokio::test]
async fn test_created_folder_is_folder_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"event": "created", "type": "folder"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let mut rx = h.bus.subscribe();
    h.store.create(folder("0", "Reading")).await.unwrap();

    let outcome = h.pipeline.process(rx.recv().await.unwrap().notification).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn test_deleted_payload_has_no_title_or_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let q1 = h.work_q1().await;
    let plan = h
        .store
        .create(bookmark(&q1, "Plan", "https://plan.example"))
        .await
        .unwrap();
    let mut rx = h.bus.subscribe();
    h.store.remove(&plan.id).await.unwrap();

    h.pipeline.process(rx.recv().await.unwrap().notification).await;

    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["event"], "deleted");
    let data = body["data"].as_object().unwrap();
    assert!(!data.contains_key("title"));
    assert!(!data.contains_key("url"));
    assert_eq!(data["parentId"], q1.as_str());
    assert_eq!(data["folderPath"], "root/Work/Q1");
}

#[tokio::test]
async fn test_moved_folder_sends_null_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let q1 = h.work_q1().await;
    let archive = h.store.create(folder("0", "Archive")).await.unwrap();
    let mut rx = h.bus.subscribe();
    h.store
        .move_node(
            &archive.id,
            MoveBookmarkRequest {
                parent_id: q1.clone(),
                index: None,
            },
        )
        .await
        .unwrap();

    h.pipeline.process(rx.recv().await.unwrap().notification).await;

    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["event"], "moved");
    assert_eq!(body["type"], "folder");
    let data = body["data"].as_object().unwrap();
    assert_eq!(data.get("url"), Some(&Value::Null));
    assert_eq!(data["title"], "Archive");
    // Path is resolved against the new parent.
    assert_eq!(data["folderPath"], "root/Work/Q1");
    assert_eq!(data["oldParentId"], "0");
}

#[tokio::test]
async fn test_updated_payload_has_no_folder_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let q1 = h.work_q1().await;
    let plan = h
        .store
        .create(bookmark(&q1, "Plan", "https://plan.example"))
        .await
        .unwrap();
    let mut rx = h.bus.subscribe();
    h.store
        .update(
            &plan.id,
            UpdateBookmarkRequest {
                title: Some("Plan v2".to_string()),
                url: None,
            },
        )
        .await
        .unwrap();

    h.pipeline.process(rx.recv().await.unwrap().notification).await;

    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["type"], "data");
    assert_eq!(body["data"]["title"], "Plan v2");
    assert!(body["data"].get("folderPath").is_none());
}

// =============================================================================
// FAILURE HANDLING
// =============================================================================

#[tokio::test]
async fn test_partial_resolution_still_delivers_without_notification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY_TEST));
    let store = Arc::new(MemoryBookmarkStore::new("root").with_event_bus(bus.clone()));
    let work = store.create(folder("0", "Work")).await.unwrap();
    let q1 = store.create(folder(&work.id, "Q1")).await.unwrap();
    let flaky = Arc::new(FlakyStore {
        inner: store.clone(),
        failing: vec![work.id.clone()],
    });
    let h = Harness::with_store(WebhookConfig::new(server.uri()), bus, store, flaky);

    let mut rx = h.bus.subscribe();
    h.store
        .create(bookmark(&q1.id, "Plan", "https://plan.example"))
        .await
        .unwrap();

    let outcome = h.pipeline.process(rx.recv().await.unwrap().notification).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert!(h.log.is_empty());
    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["data"]["folderPath"], "Q1");
    assert_eq!(body["data"]["parentFolder"], "Q1");
}

#[tokio::test]
async fn test_unresolvable_parent_delivers_without_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY_TEST));
    let store = Arc::new(MemoryBookmarkStore::new("root").with_event_bus(bus.clone()));
    let flaky = Arc::new(FlakyStore {
        inner: store.clone(),
        failing: vec!["0".to_string()],
    });
    let h = Harness::with_store(WebhookConfig::new(server.uri()), bus, store, flaky);

    let mut rx = h.bus.subscribe();
    h.store
        .create(bookmark("0", "Top", "https://top.example"))
        .await
        .unwrap();

    let outcome = h.pipeline.process(rx.recv().await.unwrap().notification).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert!(h.log.is_empty());
    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert!(body["data"].get("folderPath").is_none());
    assert!(body["data"].get("parentFolder").is_none());
}

#[tokio::test]
async fn test_chain_over_depth_cap_delivers_without_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = Harness::new(WebhookConfig::new(server.uri()));
    h.pipeline = h.pipeline.clone().with_enricher(PayloadEnricher::new(
        AncestorResolver::new().with_max_depth(1),
    ));
    let q1 = h.work_q1().await;
    let mut rx = h.bus.subscribe();
    h.store
        .create(bookmark(&q1, "Plan", "https://plan.example"))
        .await
        .unwrap();

    let outcome = h.pipeline.process(rx.recv().await.unwrap().notification).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert!(h.log.is_empty());
    let body = &received_bodies(&server.received_requests().await.unwrap())[0];
    assert_eq!(body["type"], "data");
    assert!(body["data"].get("folderPath").is_none());
    assert!(body["data"].get("parentFolder").is_none());
}

#[tokio::test]
async fn test_custom_http_client_is_used_for_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("user-agent", "hookmark-test/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("hookmark-test/1.0")
        .build()
        .unwrap();
    let h = Harness::new(WebhookConfig::new(server.uri()));
    let pipeline = h
        .pipeline
        .clone()
        .with_dispatcher(WebhookDispatcher::with_client(client));

    let outcome = pipeline.process(one_of_each_kind().remove(0)).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn test_missing_url_notifies_once_without_http() {
    for config in [
        WebhookConfig::default(),
        WebhookConfig::new(""),
        WebhookConfig::new("   "),
    ] {
        let h = Harness::new(config);
        let raw = one_of_each_kind().remove(0);

        let outcome = h.pipeline.process(raw).await;

        assert_eq!(outcome, DeliveryOutcome::Failed(FailureReason::ConfigMissing));
        let shown = h.log.recent();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Webhook URL is not set in the settings.");
    }
}

#[tokio::test]
async fn test_missing_url_reported_even_when_trigger_disabled() {
    let config = WebhookConfig::default().with_trigger(EventKind::Created, false);
    let h = Harness::new(config);

    let outcome = h.pipeline.process(one_of_each_kind().remove(0)).await;

    assert_eq!(outcome, DeliveryOutcome::Failed(FailureReason::ConfigMissing));
    assert_eq!(h.log.len(), 1);
}

#[tokio::test]
async fn test_server_error_notifies_once_and_does_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let outcome = h.pipeline.process(one_of_each_kind().remove(0)).await;

    assert_eq!(outcome, DeliveryOutcome::Failed(FailureReason::HttpStatus(500)));
    let shown = h.log.recent();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Error");
    assert!(shown[0].message.starts_with("Failed to send"));
    assert!(shown[0].message.contains("data"));
}

#[tokio::test]
async fn test_settings_change_applies_to_next_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::default());
    assert!(matches!(
        h.pipeline.process(one_of_each_kind().remove(0)).await,
        DeliveryOutcome::Failed(FailureReason::ConfigMissing)
    ));

    h.settings
        .set(WebhookConfig::new(format!("{}/second", server.uri())))
        .unwrap();
    assert_eq!(
        h.pipeline.process(one_of_each_kind().remove(0)).await,
        DeliveryOutcome::Delivered
    );
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[tokio::test]
async fn test_concurrent_events_complete_independently() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"event": "deleted"})))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"event": "created"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::new(WebhookConfig::new(server.uri()));
    let mut kinds = one_of_each_kind();
    let created = kinds.remove(0);
    let deleted = kinds.remove(1);

    let failing = h.pipeline.clone();
    let slow = tokio::spawn(async move { failing.process(deleted).await });
    let fast = tokio::spawn({
        let pipeline = h.pipeline.clone();
        async move {
            let start = std::time::Instant::now();
            let outcome = pipeline.process(created).await;
            (outcome, start.elapsed())
        }
    });

    let (fast_outcome, fast_elapsed) = fast.await.unwrap();
    let slow_outcome = slow.await.unwrap();

    assert_eq!(fast_outcome, DeliveryOutcome::Delivered);
    assert!(fast_elapsed < Duration::from_millis(300));
    assert_eq!(
        slow_outcome,
        DeliveryOutcome::Failed(FailureReason::HttpStatus(500))
    );
    assert_eq!(h.log.len(), 1);
}
