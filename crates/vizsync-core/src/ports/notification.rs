//! Notification service port (driven/secondary port)
//!
//! This module defines the interface for telling the user how an operation
//! went. Every outcome of the destination flow, good or bad, ends up here.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because notification delivery is adapter-specific.
//! - Notifications are fire-and-forget; use cases log and ignore delivery
//!   failures instead of turning them into operation failures.

use serde::{Deserialize, Serialize};

/// Kind of notification, mirroring toast styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A notification to display to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Short headline, e.g. "Destination synced"
    pub message: String,
    /// Optional detail line, e.g. the server's error text
    pub description: String,
}

impl Notification {
    /// Creates a notification without a description
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            description: String::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

/// Port trait for user notifications
#[async_trait::async_trait]
pub trait INotificationService: Send + Sync {
    /// Shows a notification to the user
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}
