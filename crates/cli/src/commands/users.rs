//! Demo account management commands.
//!
//! Operates directly on the `USERS_FILE` the storefront reads, so accounts
//! created here can log in immediately.

use std::path::Path;

use bazaar_core::registration::Registration;
use bazaar_storefront::config::users_file_from_env;
use bazaar_storefront::db::UserDirectory;
use tracing::info;

use super::CliError;

/// List registered accounts. Passwords are never shown.
///
/// # Errors
///
/// Returns an error if the account file cannot be read.
pub async fn list() -> Result<(), CliError> {
    list_in(&users_file_from_env()).await
}

async fn list_in(path: &Path) -> Result<(), CliError> {
    let users = UserDirectory::new(path).list().await?;
    for user in &users {
        info!("{:<24}  {}", user.name, user.email);
    }
    info!(count = users.len(), file = %path.display(), "Done");
    Ok(())
}

/// Register an account.
///
/// # Errors
///
/// Returns an error if a field is missing, the email is malformed or already
/// registered, or the account file cannot be written.
pub async fn register(name: String, email: String, password: String) -> Result<(), CliError> {
    register_in(&users_file_from_env(), name, email, password).await
}

async fn register_in(
    path: &Path,
    name: String,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let user = Registration {
        name,
        email,
        confirm_password: password.clone(),
        password,
    }
    .validate()?;

    let email = user.email.clone();
    UserDirectory::new(path).register(user).await?;
    info!(email = %email, file = %path.display(), "Account registered");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use bazaar_storefront::db::RepositoryError;

    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("bazaar-cli-{}", uuid::Uuid::new_v4()))
            .join("users.json")
    }

    #[tokio::test]
    async fn test_register_writes_account() {
        let path = temp_path();
        register_in(&path, "Ada".into(), "ada@example.com".into(), "pw".into())
            .await
            .unwrap();

        let users = UserDirectory::new(&path).list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email.as_str(), "ada@example.com");
        list_in(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let path = temp_path();
        register_in(&path, "Ada".into(), "ada@example.com".into(), "pw".into())
            .await
            .unwrap();

        let err = register_in(&path, "Ada".into(), "ada@example.com".into(), "pw".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Repository(RepositoryError::DuplicateEmail)
        ));

        let err = register_in(&path, String::new(), "x@example.com".into(), "pw".into())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Registration(_)));
    }
}
