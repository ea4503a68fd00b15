//! Checkout form validation and order summary.
//!
//! Payment is simulated: nothing here talks to a processor. Validation only
//! checks that the required fields are present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::notification::Notification;
use crate::types::Price;

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Why a checkout was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("missing shipping fields: {}", .0.join(", "))]
    MissingShipping(Vec<&'static str>),
    #[error("missing payment fields: {}", .0.join(", "))]
    MissingPayment(Vec<&'static str>),
}

impl CheckoutError {
    /// The notification shown to the user.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::EmptyCart => Notification::error(
                "Your cart is empty",
                "Add some products to your cart before proceeding to checkout.",
            ),
            Self::MissingShipping(_) => Notification::error(
                "Missing information",
                "Please fill in all required shipping fields",
            ),
            Self::MissingPayment(_) => Notification::error(
                "Missing payment information",
                "Please fill in all required payment fields",
            ),
        }
    }
}

/// Where to send the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub email: String,
    /// Optional.
    #[serde(default)]
    pub phone: String,
}

impl ShippingInfo {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Card details. Never stored or transmitted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl std::fmt::Debug for CardInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardInfo")
            .field("card_number", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .field("expiry", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl CardInfo {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("card_number", &self.card_number),
            ("card_name", &self.card_name),
            ("expiry", &self.expiry),
            ("cvv", &self.cvv),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// How the order is paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard(CardInfo),
    /// Redirect flow; no fields collected here.
    PayPal,
}

impl PaymentMethod {
    /// Form key for this method.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::CreditCard(_) => "credit-card",
            Self::PayPal => "paypal",
        }
    }
}

/// A submitted checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub shipping: ShippingInfo,
    pub payment: PaymentMethod,
}

/// A checkout that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub shipping: ShippingInfo,
    pub payment: PaymentMethod,
    pub summary: OrderSummary,
}

impl CheckoutForm {
    /// Check the form against the cart.
    ///
    /// Shipping fields are checked before payment fields, so the user sees
    /// one problem at a time.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the cart is empty or a required field is
    /// missing. Whitespace-only values count as missing.
    pub fn validate(self, cart: &Cart) -> Result<ValidatedCheckout, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let missing = self.shipping.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingShipping(missing));
        }

        if let PaymentMethod::CreditCard(card) = &self.payment {
            let missing = card.missing_fields();
            if !missing.is_empty() {
                return Err(CheckoutError::MissingPayment(missing));
            }
        }

        Ok(ValidatedCheckout {
            shipping: self.shipping,
            payment: self.payment,
            summary: OrderSummary::for_cart(cart),
        })
    }
}

/// Amounts shown in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    /// Shipping is always free.
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summary for the current cart contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        let subtotal = cart.total();
        let tax = subtotal.scaled(TAX_RATE);
        Self {
            subtotal,
            shipping: Price::ZERO,
            tax,
            total: subtotal + tax,
        }
    }
}
