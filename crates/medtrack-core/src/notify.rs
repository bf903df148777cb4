//! Transient user notifications

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Visual style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    Success,
    Warning,
}

impl std::fmt::Display for NotificationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStyle::Success => write!(f, "success"),
            NotificationStyle::Warning => write!(f, "warning"),
        }
    }
}

/// A transient message and how long it stays on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub style: NotificationStyle,
    /// Time before the sink dismisses it
    pub duration: Duration,
}

/// Notifier reference type
pub type NotifierRef = Arc<dyn Notifier>;

/// Fire-and-forget sink for auto-dismissing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
