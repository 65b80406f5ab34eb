//! User-visible failure alerts.
//!
//! [`FailureNotifier`] decides which pipeline outcomes warrant an alert and
//! what it says; the [`Notifier`] it wraps decides how it is shown.
//! [`NotificationLog`] is the host's notifier: it writes each alert to the
//! log and keeps the most recent ones for the API to list.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use hookmark_core::defaults::{
    NOTIFICATION_HISTORY, NOTIFY_MSG_DELIVERY_FAILED, NOTIFY_MSG_URL_MISSING, NOTIFY_TITLE_ERROR,
};
use hookmark_core::{FailureReason, Notifier};

/// Raises alerts for failures the user must act on.
#[derive(Clone)]
pub struct FailureNotifier {
    notifier: Arc<dyn Notifier>,
}

impl FailureNotifier {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Show the alert matching `reason`.
    pub fn notify(&self, reason: &FailureReason) {
        let message = match reason {
            FailureReason::ConfigMissing => NOTIFY_MSG_URL_MISSING,
            FailureReason::HttpStatus(_)
            | FailureReason::Transport(_)
            | FailureReason::Serialization(_) => NOTIFY_MSG_DELIVERY_FAILED,
        };
        self.notifier.show(NOTIFY_TITLE_ERROR, message);
    }
}

/// One alert as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

/// Notifier that logs alerts and keeps a bounded history of them.
pub struct NotificationLog {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(NOTIFICATION_HISTORY)
    }
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Retained alerts, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.recent().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn show(&self, title: &str, message: &str) {
        tracing::warn!(target: "hookmark::notify", %title, %message, "Notification");
        let entry = Notification {
            title: title.to_string(),
            message: message.to_string(),
            shown_at: Utc::now(),
        };
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}
