//! CLI command implementations.

pub mod catalog;
pub mod users;

use bazaar_core::registration::RegistrationError;
use bazaar_storefront::catalog::CatalogError;
use bazaar_storefront::config::ConfigError;
use bazaar_storefront::db::RepositoryError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("registration rejected: {0}")]
    Registration(#[from] RegistrationError),
}
