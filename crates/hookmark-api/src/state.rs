//! Shared application state.

use std::sync::Arc;

use tracing::info;

use hookmark_core::EventBus;
use hookmark_store::{ConfigResult, MemoryBookmarkStore, SettingsStore};
use hookmark_webhook::{NotificationLog, Pipeline};

use crate::config::ServerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bookmark tree; mutations are reported on `event_bus`.
    pub store: Arc<MemoryBookmarkStore>,
    /// Webhook settings read by the pipeline on every event.
    pub settings: Arc<SettingsStore>,
    /// Alerts raised by the pipeline.
    pub notifications: Arc<NotificationLog>,
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Build state from host config, loading settings from disk.
    pub fn from_config(config: &ServerConfig) -> ConfigResult<Self> {
        let first_run = !config.settings_path.exists();
        let settings = SettingsStore::load(&config.settings_path)?;
        if first_run {
            info!(
                settings_path = %config.settings_path.display(),
                "No webhook settings yet; configure them with PUT /api/v1/settings"
            );
        }
        Ok(Self::new(
            settings,
            &config.root_title,
            config.event_bus_capacity,
            config.notification_history,
        ))
    }

    pub fn new(
        settings: SettingsStore,
        root_title: &str,
        event_bus_capacity: usize,
        notification_history: usize,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new(event_bus_capacity));
        let store = Arc::new(
            MemoryBookmarkStore::with_default_folders(root_title).with_event_bus(event_bus.clone()),
        );
        Self {
            store,
            settings: Arc::new(settings),
            notifications: Arc::new(NotificationLog::new(notification_history)),
            event_bus,
        }
    }

    /// The webhook pipeline wired to this state's collaborators.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.store.clone(),
            self.settings.clone(),
            self.notifications.clone(),
        )
    }
}
