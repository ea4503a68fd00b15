//! Welcome page for logged-in demo accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::CurrentUser;

/// Welcome page template.
#[derive(Template, WebTemplate)]
#[template(path = "welcome.html")]
pub struct WelcomeTemplate {
    pub page: PageContext,
    pub user: CurrentUser,
}

/// Greet the logged-in user. Anonymous visitors are sent to the login page.
#[instrument(skip_all)]
pub async fn welcome(RequireAuth(user): RequireAuth, page: PageContext) -> impl IntoResponse {
    WelcomeTemplate { page, user }
}
