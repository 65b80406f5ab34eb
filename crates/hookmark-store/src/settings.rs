//! Webhook settings storage.
//!
//! Settings can be held purely in memory or persisted to a TOML file:
//!
//! ```toml
//! webhook_url = "https://hooks.example.com/bookmarks?token=${HOOK_TOKEN}"
//!
//! [triggers]
//! created = true
//! updated = true
//! deleted = false
//! moved = true
//! ```
//!
//! `${VAR}` references are kept as written: the store holds, renders and
//! saves the unresolved form, and only the snapshot handed to the pipeline
//! carries environment values. Secrets carried in the URL stay out of the
//! file and out of the settings API. Leaving out the `[triggers]` table
//! enables every event kind.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use hookmark_core::{ConfigProvider, EventKind, TriggerMap, WebhookConfig};

/// Settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to write settings file: {0}")]
    FileWrite(#[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for hookmark_core::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Validation(msg) => hookmark_core::Error::InvalidInput(msg),
            other => hookmark_core::Error::Config(other.to_string()),
        }
    }
}

/// Check that a config can be stored.
///
/// An empty URL is allowed (the user cleared it); a non-empty one must be
/// an http(s) URL once `${VAR}` references are resolved.
pub fn validate(config: &WebhookConfig) -> ConfigResult<()> {
    let resolved = resolve_env(config);
    if let Some(url) = resolved.webhook_url() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "webhook_url must start with http:// or https://, got: {}",
                url
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    triggers: Option<BTreeMap<String, bool>>,
}

impl TomlSettings {
    fn into_config(self) -> ConfigResult<WebhookConfig> {
        let triggers = match self.triggers {
            None => None,
            Some(raw) => {
                let mut map = TriggerMap::new();
                for (name, enabled) in raw {
                    let kind: EventKind = name.parse().map_err(|_| {
                        ConfigError::Validation(format!("Unknown trigger: {}", name))
                    })?;
                    map.insert(kind, enabled);
                }
                Some(map)
            }
        };
        Ok(WebhookConfig {
            webhook_url: self.webhook_url,
            triggers,
        })
    }

    fn from_config(config: &WebhookConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            triggers: config.triggers.as_ref().map(|t| {
                t.iter()
                    .map(|(kind, enabled)| (kind.to_string(), *enabled))
                    .collect()
            }),
        }
    }
}

/// Parse settings from TOML text. `${VAR}` references are left in place.
pub fn parse_settings(content: &str) -> ConfigResult<WebhookConfig> {
    let parsed: TomlSettings = toml::from_str(content)?;
    let config = parsed.into_config()?;
    validate(&config)?;
    Ok(config)
}

/// Render settings as TOML.
pub fn render_settings(config: &WebhookConfig) -> ConfigResult<String> {
    Ok(toml::to_string_pretty(&TomlSettings::from_config(config))?)
}

/// Copy of `config` with `${VAR}` references in the URL replaced by
/// environment values. Unset variables are left as written.
pub fn resolve_env(config: &WebhookConfig) -> WebhookConfig {
    WebhookConfig {
        webhook_url: config.webhook_url.as_deref().map(substitute_env_vars),
        triggers: config.triggers.clone(),
    }
}

fn substitute_env_vars(content: &str) -> String {
    let re = match regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

/// Settings store backing the [`ConfigProvider`] the pipeline reads.
///
/// Readers always get a full snapshot; writers replace the whole config.
/// [`SettingsStore::stored`] returns the unresolved form for display and
/// editing; [`ConfigProvider::get`] returns it resolved for delivery.
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<WebhookConfig>,
}

impl SettingsStore {
    /// Settings that live only as long as the process.
    pub fn in_memory(config: WebhookConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(config),
        }
    }

    /// Load settings from `path`, starting empty if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            info!("Loading webhook settings from: {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(ConfigError::FileRead)?;
            parse_settings(&content)?
        } else {
            debug!(
                "Settings file not found at {}, starting unconfigured",
                path.display()
            );
            WebhookConfig::default()
        };
        Ok(Self {
            path: Some(path),
            current: RwLock::new(config),
        })
    }

    /// File backing this store, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the settings, persisting them first when file-backed.
    pub fn set(&self, config: WebhookConfig) -> ConfigResult<()> {
        validate(&config)?;
        if let Some(path) = &self.path {
            let rendered = render_settings(&config)?;
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(ConfigError::FileWrite)?;
            }
            std::fs::write(path, rendered).map_err(ConfigError::FileWrite)?;
        }
        info!(
            webhook_url_set = config.webhook_url().is_some(),
            triggers = ?config.triggers,
            "Webhook settings saved"
        );
        match self.current.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
        Ok(())
    }

    /// Settings as stored, with `${VAR}` references unresolved.
    pub fn stored(&self) -> WebhookConfig {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether a usable webhook URL is configured.
    pub fn is_configured(&self) -> bool {
        self.get().webhook_url().is_some()
    }
}

impl ConfigProvider for SettingsStore {
    fn get(&self) -> WebhookConfig {
        resolve_env(&self.stored())
    }
}
