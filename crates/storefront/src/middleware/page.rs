//! Per-page chrome shared by every rendered template.

use axum::{extract::FromRequestParts, http::request::Parts};
use bazaar_core::Notification;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::models::session::{load_cart, take_notifications};

/// Header and notification data for the base layout.
///
/// Extracting this drains the session's notification queue, so only handlers
/// that render a page should take it.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub notifications: Vec<Notification>,
    pub cart_count: u32,
    pub current_user: Option<CurrentUser>,
}

impl PageContext {
    /// Build the context from a session, draining queued notifications.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        let notifications = take_notifications(session).await?;
        let cart_count = load_cart(session).await?.item_count();
        let current_user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;

        Ok(Self {
            notifications,
            cart_count,
            current_user,
        })
    }

    /// Add a notification produced while handling this request.
    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Self::load(session).await
    }
}
