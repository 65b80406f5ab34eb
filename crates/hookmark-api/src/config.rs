//! Host configuration from the environment.

use std::path::PathBuf;

use hookmark_core::defaults;

/// Settings the host reads at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub settings_path: PathBuf,
    pub root_title: String,
    pub event_bus_capacity: usize,
    pub notification_history: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: defaults::SERVER_PORT,
            settings_path: PathBuf::from(defaults::SETTINGS_PATH),
            root_title: defaults::ROOT_TITLE.to_string(),
            event_bus_capacity: defaults::EVENT_BUS_CAPACITY,
            notification_history: defaults::NOTIFICATION_HISTORY,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `HOST` | `0.0.0.0` | Bind address |
    /// | `PORT` | `3400` | Bind port |
    /// | `HOOKMARK_SETTINGS_PATH` | `hookmark.toml` | Webhook settings file |
    /// | `HOOKMARK_ROOT_TITLE` | empty | Title of the root folder |
    /// | `EVENT_BUS_CAPACITY` | `256` | Buffered notifications per subscriber |
    /// | `NOTIFICATION_HISTORY` | `50` | Alerts kept for the API |
    pub fn from_env() -> Self {
        let base = Self::default();

        let host = std::env::var("HOST").unwrap_or(base.host);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(base.port);

        let settings_path = std::env::var("HOOKMARK_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or(base.settings_path);

        let root_title = std::env::var("HOOKMARK_ROOT_TITLE").unwrap_or(base.root_title);

        let event_bus_capacity = std::env::var("EVENT_BUS_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(base.event_bus_capacity)
            .max(1);

        let notification_history = std::env::var("NOTIFICATION_HISTORY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(base.notification_history)
            .max(1);

        Self {
            host,
            port,
            settings_path,
            root_title,
            event_bus_capacity,
            notification_history,
        }
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
