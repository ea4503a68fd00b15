//! Simulated order placement.
//!
//! No payment processor is involved. A placed order waits for the configured
//! delay, gets a fresh ID, and is then forgotten.

use std::time::Duration;

use bazaar_core::Cart;
use bazaar_core::checkout::{CheckoutError, CheckoutForm, OrderSummary};
use bazaar_core::notification::Notification;
use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

/// A successfully placed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub summary: OrderSummary,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// The notification shown after the order goes through.
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification::info(
            "Order Placed Successfully!",
            "Thank you for your purchase. Your order has been confirmed.",
        )
    }
}

/// Validate the form against the cart and "process" the payment.
///
/// The cart is left untouched; the caller clears it once the order is
/// confirmed.
///
/// # Errors
///
/// Returns [`CheckoutError`] if the cart is empty or a required field is
/// missing. Nothing is delayed in that case.
#[instrument(skip(cart, form), fields(items = cart.items().len(), payment = form.payment.key()))]
pub async fn place_order(
    cart: &Cart,
    form: CheckoutForm,
    processing_delay: Duration,
) -> Result<OrderConfirmation, CheckoutError> {
    let validated = form.validate(cart)?;

    if !processing_delay.is_zero() {
        tokio::time::sleep(processing_delay).await;
    }

    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4(),
        summary: validated.summary,
        placed_at: Utc::now(),
    };

    tracing::info!(
        order_id = %confirmation.order_id,
        total = %confirmation.summary.total,
        "Order placed"
    );

    Ok(confirmation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::checkout::{CardInfo, PaymentMethod, ShippingInfo};
    use bazaar_core::types::{Price, ProductId};
    use bazaar_core::{Product, Rating};

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            title: "Backpack".into(),
            price: Price::from_cents(10995),
            description: "Fits a laptop".into(),
            category: "men's clothing".into(),
            image: "https://example.com/1.jpg".into(),
            rating: Rating::default(),
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            address: "1 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip_code: "12345".into(),
            email: "ada@example.com".into(),
            phone: String::new(),
        }
    }

    fn cart_with_product() -> Cart {
        let mut cart = Cart::new();
        cart.add_to_cart(&product(), 1, &mut Vec::new());
        cart
    }

    #[tokio::test]
    async fn test_place_order_returns_summary() {
        let form = CheckoutForm {
            shipping: shipping(),
            payment: PaymentMethod::PayPal,
        };

        let confirmation = place_order(&cart_with_product(), form, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(confirmation.summary.total.to_string(), "$118.75");
        assert_eq!(
            confirmation.notification().title,
            "Order Placed Successfully!"
        );
    }

    #[tokio::test]
    async fn test_place_order_rejects_missing_card_fields() {
        let form = CheckoutForm {
            shipping: shipping(),
            payment: PaymentMethod::CreditCard(CardInfo::default()),
        };

        let err = place_order(&cart_with_product(), form, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPayment(_)));
    }

    #[tokio::test]
    async fn test_place_order_waits_for_processing_delay() {
        let form = CheckoutForm {
            shipping: shipping(),
            payment: PaymentMethod::PayPal,
        };
        let started = tokio::time::Instant::now();

        place_order(&cart_with_product(), form, Duration::from_millis(50))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
