//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::{CatalogQuery, Product, ProductId, SortOrder};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::CatalogError;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub selected_category: String,
    pub search: String,
    pub sort: SortOrder,
    pub sort_options: [SortOrder; 5],
    pub load_error: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: Product,
}

/// Product not found template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

/// Display the product listing with category, search and sort filters.
///
/// A failed catalog fetch renders the page with a "failed to load" notice
/// and a 502 status.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(params): Query<ListingQuery>,
) -> Response {
    let query = CatalogQuery::from_params(
        params.category.as_deref(),
        params.q.as_deref(),
        params.sort.as_deref(),
    );

    let products = match &query.category {
        Some(category) => state.catalog().products_in_category(category).await,
        None => state.catalog().products().await,
    };
    let categories = state.catalog().categories().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });

    let (products, load_error) = match products {
        Ok(products) => (query.apply(products), false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            (Vec::new(), true)
        }
    };

    let template = ProductsIndexTemplate {
        page,
        products,
        categories,
        selected_category: query.category.clone().unwrap_or_default(),
        search: query.search.clone().unwrap_or_default(),
        sort: query.sort,
        sort_options: SortOrder::ALL,
        load_error,
    };

    if load_error {
        (StatusCode::BAD_GATEWAY, template).into_response()
    } else {
        template.into_response()
    }
}

/// Display product detail page.
///
/// Unknown IDs, malformed IDs and failed fetches all render the
/// "Product not found" page with a 404.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return not_found(page);
    };

    match state.catalog().product(id).await {
        Ok(product) => ProductShowTemplate { page, product }.into_response(),
        Err(CatalogError::NotFound(_)) => not_found(page),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Failed to load product");
            not_found(page)
        }
    }
}

fn not_found(page: PageContext) -> Response {
    (StatusCode::NOT_FOUND, ProductNotFoundTemplate { page }).into_response()
}
