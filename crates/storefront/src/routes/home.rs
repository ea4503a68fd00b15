//! Home page and health check.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::Product;
use bazaar_core::catalog::featured;
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<Product>,
    pub categories: Vec<String>,
    pub load_error: bool,
}

/// Display the home page: featured products and category links.
///
/// Catalog failures are logged and rendered as an inline notice rather than
/// failing the whole page.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let (products, categories) =
        tokio::join!(state.catalog().products(), state.catalog().categories());

    let mut load_error = false;
    let products = products.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load featured products");
        load_error = true;
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });

    HomeTemplate {
        page,
        featured: featured(products),
        categories,
        load_error,
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
