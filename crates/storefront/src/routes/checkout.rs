//! Checkout route handlers.
//!
//! Payment is simulated. A valid submission waits for the configured
//! processing delay, empties the cart and sends the visitor home.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::Cart;
use bazaar_core::checkout::{CardInfo, CheckoutForm, OrderSummary, PaymentMethod, ShippingInfo};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::session::{load_cart, push_notifications, save_cart};
use crate::services::checkout::place_order;
use crate::state::AppState;

/// Payment method key for PayPal.
const PAYPAL: &str = "paypal";

/// Checkout form data as posted by the browser.
///
/// Every field defaults to empty so that missing inputs surface as
/// validation notices instead of a rejected request.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutFormData {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub email: String,
    pub phone: String,
    pub payment_method: String,
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl Default for CheckoutFormData {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            email: String::new(),
            phone: String::new(),
            payment_method: "credit-card".to_string(),
            card_number: String::new(),
            card_name: String::new(),
            expiry: String::new(),
            cvv: String::new(),
        }
    }
}

impl CheckoutFormData {
    /// Whether PayPal is the selected payment method.
    #[must_use]
    pub fn is_paypal(&self) -> bool {
        self.payment_method == PAYPAL
    }

    /// Copy of the form suitable for re-rendering: card details are dropped.
    #[must_use]
    fn without_card_secrets(&self) -> Self {
        Self {
            card_number: String::new(),
            expiry: String::new(),
            cvv: String::new(),
            ..self.clone()
        }
    }
}

impl From<CheckoutFormData> for CheckoutForm {
    fn from(data: CheckoutFormData) -> Self {
        let payment = if data.is_paypal() {
            PaymentMethod::PayPal
        } else {
            PaymentMethod::CreditCard(CardInfo {
                card_number: data.card_number,
                card_name: data.card_name,
                expiry: data.expiry,
                cvv: data.cvv,
            })
        };

        Self {
            shipping: ShippingInfo {
                first_name: data.first_name,
                last_name: data.last_name,
                address: data.address,
                city: data.city,
                state: data.state,
                zip_code: data.zip_code,
                email: data.email,
                phone: data.phone,
            },
            payment,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: Cart,
    pub summary: OrderSummary,
    pub form: CheckoutFormData,
}

/// Empty cart template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/empty.html")]
pub struct CheckoutEmptyTemplate {
    pub page: PageContext,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout form, or the empty-cart notice.
#[instrument(skip(session, page))]
pub async fn show(session: Session, page: PageContext) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    Ok(render(page, cart, CheckoutFormData::default(), StatusCode::OK))
}

/// Place the order.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Form(data): Form<CheckoutFormData>,
) -> Result<Response, AppError> {
    let mut cart = load_cart(&session).await?;
    let echo = data.without_card_secrets();

    match place_order(&cart, data.into(), state.config().checkout_delay).await {
        Ok(confirmation) => {
            let mut notifications = Vec::new();
            cart.clear_cart(&mut notifications);
            notifications.push(confirmation.notification());
            save_cart(&session, &cart).await?;
            push_notifications(&session, notifications).await?;

            let order_id = confirmation.order_id.to_string();
            add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            tracing::info!(reason = %err, "Checkout rejected");
            let mut page = PageContext::load(&session).await?;
            page.notify(err.notification());
            Ok(render(page, cart, echo, StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

fn render(page: PageContext, cart: Cart, form: CheckoutFormData, status: StatusCode) -> Response {
    if cart.is_empty() {
        return (status, CheckoutEmptyTemplate { page }).into_response();
    }

    let summary = OrderSummary::for_cart(&cart);
    (
        status,
        CheckoutTemplate {
            page,
            cart,
            summary,
            form,
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data_defaults_to_credit_card() {
        let form: CheckoutForm = CheckoutFormData::default().into();
        assert_eq!(form.payment.key(), "credit-card");
    }

    #[test]
    fn test_paypal_selection_ignores_card_fields() {
        let data = CheckoutFormData {
            payment_method: PAYPAL.to_string(),
            card_number: "4242".to_string(),
            ..CheckoutFormData::default()
        };
        let form: CheckoutForm = data.into();
        assert_eq!(form.payment, PaymentMethod::PayPal);
    }

    #[test]
    fn test_rerendered_form_drops_card_secrets() {
        let data = CheckoutFormData {
            first_name: "Ada".to_string(),
            card_number: "4242424242424242".to_string(),
            card_name: "Ada Lovelace".to_string(),
            cvv: "123".to_string(),
            ..CheckoutFormData::default()
        };
        let echo = data.without_card_secrets();
        assert_eq!(echo.first_name, "Ada");
        assert_eq!(echo.card_name, "Ada Lovelace");
        assert!(echo.card_number.is_empty());
        assert!(echo.cvv.is_empty());
    }
}
