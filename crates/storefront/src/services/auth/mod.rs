//! Demo account service.
//!
//! Registration and login against the [`UserDirectory`]. There is no password
//! hashing; accounts only gate the welcome page.

mod error;

pub use error::AuthError;

use bazaar_core::Email;
use bazaar_core::registration::{RegisteredUser, Registration};
use tracing::instrument;

use crate::db::UserDirectory;
use crate::models::session::CurrentUser;

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a UserDirectory,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a UserDirectory) -> Self {
        Self { users }
    }

    /// Validate a registration form and store the account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Registration` if the form is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, form))]
    pub async fn register(&self, form: Registration) -> Result<RegisteredUser, AuthError> {
        let user = form.validate()?;
        self.users.register(user.clone()).await?;
        Ok(user)
    }

    /// Check an email and password against the stored accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed, unknown,
    /// or the password does not match.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .authenticate(&email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(CurrentUser::from(user))
    }
}
