//! Demo account registration.
//!
//! Accounts exist only to gate the welcome page. Passwords are stored as
//! given; there is no hashing and no real authentication.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notification::Notification;
use crate::types::{Email, EmailError};

/// Why a registration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("all fields are required")]
    MissingFields,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl RegistrationError {
    /// The notification shown to the user.
    #[must_use]
    pub fn notification(&self) -> Notification {
        let description = match self {
            Self::MissingFields => "All fields are required",
            Self::PasswordMismatch => "Passwords do not match",
            Self::InvalidEmail(_) => "Please enter a valid email address",
        };
        Notification::error("Error", description)
    }
}

/// A submitted registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A stored account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl Registration {
    /// Validate the form, in the order the user is told about problems:
    /// required fields, then password confirmation, then email shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] found.
    pub fn validate(self) -> Result<RegisteredUser, RegistrationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(RegistrationError::MissingFields);
        }

        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        let email = Email::parse(&self.email)?;

        Ok(RegisteredUser {
            name: self.name.trim().to_owned(),
            email,
            password: self.password,
        })
    }
}
