//! User feedback notifications.
//!
//! Domain operations report what happened to the user through a
//! [`NotificationSink`]. The storefront drains these into the session and
//! shows them on the next rendered page; tests collect them into a `Vec`.

use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Neutral or positive feedback.
    #[default]
    Info,
    /// Something the user must fix.
    Error,
}

impl Severity {
    /// CSS modifier used by the templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notice-info",
            Self::Error => "notice-error",
        }
    }
}

/// A fire-and-forget message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    /// Informational notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    /// Error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }

    /// Whether this is an error notification.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Receives notifications emitted by domain operations.
pub trait NotificationSink {
    /// Deliver one notification.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
