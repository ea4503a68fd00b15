//! Authentication error types.

use bazaar_core::notification::Notification;
use bazaar_core::registration::RegistrationError;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The registration form was rejected.
    #[error("invalid registration: {0}")]
    Registration(#[from] RegistrationError),

    /// Invalid credentials (wrong password, unknown email or malformed email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Account storage failed.
    #[error("storage error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => Self::UserAlreadyExists,
            other => Self::Repository(other),
        }
    }
}

impl AuthError {
    /// The notification shown to the user, if this is a user-facing failure.
    ///
    /// Storage failures return `None`; they surface as server errors instead.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::Registration(err) => Some(err.notification()),
            Self::InvalidCredentials => Some(Notification::error(
                "Login failed",
                "Invalid email or password",
            )),
            Self::UserAlreadyExists => {
                Some(Notification::error("Error", "Email already registered"))
            }
            Self::Repository(_) => None,
        }
    }
}
