//! Session-related types.
//!
//! Everything per-visitor lives in the session: the cart, queued
//! notifications, and the logged-in demo account.

use bazaar_core::registration::RegisteredUser;
use bazaar_core::{Cart, Email, Notification};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Display name given at registration.
    pub name: String,
    /// Account email.
    pub email: Email,
}

impl From<RegisteredUser> for CurrentUser {
    fn from(user: RegisteredUser) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for notifications waiting to be shown.
    pub const NOTIFICATIONS: &str = "notifications";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

// =============================================================================
// Cart
// =============================================================================

/// Load the visitor's cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value is invalid.
pub async fn load_cart(session: &Session) -> Result<Cart, SessionError> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), SessionError> {
    session.insert(keys::CART, cart).await
}

// =============================================================================
// Notifications
// =============================================================================

/// Queue notifications for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_notifications(
    session: &Session,
    notifications: impl IntoIterator<Item = Notification>,
) -> Result<(), SessionError> {
    let mut queued: Vec<Notification> = session
        .get(keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default();
    let before = queued.len();
    queued.extend(notifications);

    if queued.len() == before {
        return Ok(());
    }
    session.insert(keys::NOTIFICATIONS, queued).await
}

/// Queue a single notification.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_notification(
    session: &Session,
    notification: Notification,
) -> Result<(), SessionError> {
    push_notifications(session, [notification]).await
}

/// Remove and return every queued notification, oldest first.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_notifications(session: &Session) -> Result<Vec<Notification>, SessionError> {
    Ok(session
        .remove::<Vec<Notification>>(keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default())
}
