//! Authentication route handlers.
//!
//! Login, registration and logout for demo accounts stored in the local
//! [`UserDirectory`](crate::db::UserDirectory).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::Notification;
use bazaar_core::registration::Registration;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext, clear_current_user, set_current_user};
use crate::models::session::push_notification;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data. Passwords are never echoed back.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display login page. Logged-in visitors go straight to the welcome page.
#[instrument(skip_all)]
pub async fn login_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/welcome").into_response());
    }

    let page = PageContext::load(&session).await?;
    Ok(LoginTemplate {
        page,
        email: String::new(),
    }
    .into_response())
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.users());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(user.email.as_str(), &user.name);
            push_notification(
                &session,
                Notification::info("Login successful!", format!("Welcome back, {}", user.name)),
            )
            .await?;
            tracing::info!(email = %user.email, "Demo account logged in");
            Ok(Redirect::to("/welcome").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Repository(e)),
        Err(err) => {
            tracing::info!(reason = %err, "Login rejected");
            let mut page = PageContext::load(&session).await?;
            if let Some(notification) = err.notification() {
                page.notify(notification);
            }
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    page,
                    email: form.email,
                },
            )
                .into_response())
        }
    }
}

/// Display registration page.
#[instrument(skip_all)]
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        page,
        name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// Validation failures and duplicate emails re-render the form with a 422
/// and an error notification. Success sends the visitor to the login page.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let name = form.name.clone();
    let email = form.email.clone();
    let auth = AuthService::new(state.users());

    match auth.register(form.into()).await {
        Ok(user) => {
            tracing::info!(email = %user.email, "Demo account registered");
            push_notification(
                &session,
                Notification::info("Success", "Registration successful! Please login."),
            )
            .await?;
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Repository(e)),
        Err(err) => {
            tracing::info!(reason = %err, "Registration rejected");
            let mut page = PageContext::load(&session).await?;
            if let Some(notification) = err.notification() {
                page.notify(notification);
            }
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                RegisterTemplate { page, name, email },
            )
                .into_response())
        }
    }
}

/// Handle logout. The cart survives; only the account is forgotten.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}
