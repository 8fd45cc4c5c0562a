//! Notification surface for the presentation layer.
//!
//! Every mutation outcome is reported as a [`Notification`] (title, message,
//! severity). The coordinator emits them through the [`Notifier`] seam so the
//! presentation layer can render modals and tests can capture them in memory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Sink for notifications emitted by the mutation coordinator.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier: logs through `tracing` at a level matching the severity.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => {
                tracing::info!(title = %notification.title, message = %notification.message, "notification")
            }
            Severity::Warning => {
                tracing::warn!(title = %notification.title, message = %notification.message, "notification")
            }
            Severity::Error => {
                tracing::error!(title = %notification.title, message = %notification.message, "notification")
            }
        }
    }
}

/// Captures notifications in memory. Used by coordinator tests to assert on
/// exactly which notifications an operation produced.
#[derive(Debug, Default)]
pub struct CapturingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl CapturingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications.lock().unwrap())
    }

    pub fn captured(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for CapturingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
