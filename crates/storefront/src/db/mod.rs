//! Local storage for the storefront.
//!
//! The catalog is the source of truth for products, and carts live only in
//! the session. The one thing stored locally is the list of demo accounts,
//! kept as a JSON file:
//!
//! ```json
//! [{ "name": "Ada", "email": "ada@example.com", "password": "..." }]
//! ```

pub mod users;

pub use users::UserDirectory;

use thiserror::Error;

/// Errors from the local stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not valid JSON for the expected shape.
    #[error("data corruption in {path}: {source}")]
    DataCorruption {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An account with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,
}
