//! Cart route handlers.
//!
//! The cart lives in the session. Every mutation is a form POST that updates
//! the session copy, queues the resulting notifications and redirects back.
//!
//! Each handler loads the cart, changes it and saves it back with no lock
//! across the two steps. Overlapping POSTs from the same session (a double
//! submit) are last-writer-wins, so one of the changes can be lost.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{Cart, Notification, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogError;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::session::{load_cart, push_notification, push_notifications, save_cart};
use crate::state::AppState;

/// Where cart actions land when no valid `return_to` is given.
const DEFAULT_RETURN: &str = "/cart";

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: Cart,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session, page))]
pub async fn show(session: Session, page: PageContext) -> Result<impl IntoResponse, AppError> {
    let cart = load_cart(&session).await?;
    Ok(CartShowTemplate { page, cart })
}

/// Add a product to the cart.
///
/// The product is looked up in the catalog so the cart always stores the
/// catalog's title and price. Quantity defaults to 1.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let return_to = safe_return_to(form.return_to.as_deref());

    let product = match state.catalog().product(form.product_id).await {
        Ok(product) => product,
        Err(CatalogError::NotFound(_)) => {
            push_notification(
                &session,
                Notification::error("Product not found", "That product is no longer available"),
            )
            .await?;
            return Ok(Redirect::to(return_to).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let mut cart = load_cart(&session).await?;
    let mut notifications = Vec::new();
    cart.add_to_cart(&product, form.quantity.unwrap_or(1), &mut notifications);
    save_cart(&session, &cart).await?;
    push_notifications(&session, notifications).await?;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok(Redirect::to(return_to).into_response())
}

/// Set a line's quantity. Values below 1 and unknown products are ignored.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(form.product_id, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(Redirect::to(DEFAULT_RETURN))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;
    let mut notifications = Vec::new();
    cart.remove_from_cart(form.product_id, &mut notifications);
    save_cart(&session, &cart).await?;
    push_notifications(&session, notifications).await?;
    Ok(Redirect::to(DEFAULT_RETURN))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;
    let mut notifications = Vec::new();
    cart.clear_cart(&mut notifications);
    save_cart(&session, &cart).await?;
    push_notifications(&session, notifications).await?;
    Ok(Redirect::to(DEFAULT_RETURN))
}

/// Cart count badge fragment. Does not consume queued notifications.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse, AppError> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

/// Accept only same-site absolute paths as a post-action destination.
fn safe_return_to(raw: Option<&str>) -> &str {
    match raw.map(str::trim) {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => DEFAULT_RETURN,
    }
}
