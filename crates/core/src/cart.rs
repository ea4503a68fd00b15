//! Shopping cart state.
//!
//! A [`Cart`] is an insertion-ordered list of line items with at most one
//! item per product. It is owned by whoever holds the session (the storefront
//! keeps one per browser session) and is only mutated through the four
//! operations below. The total is always derived from the items.
//!
//! Operations that the user should hear about report through a
//! [`NotificationSink`]:
//!
//! | Operation | Notification |
//! |---|---|
//! | [`Cart::add_to_cart`] | "added" or "updated", unless the quantity is below 1 |
//! | [`Cart::remove_from_cart`] | "removed", only if the item existed |
//! | [`Cart::update_quantity`] | none |
//! | [`Cart::clear_cart`] | "cleared", always |

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::notification::{Notification, NotificationSink};
use crate::types::{Price, ProductId};

/// A product plus the quantity being purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Product ID (the line item identity).
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The cart for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Converts a caller-supplied quantity, rejecting anything below 1 and
/// clamping anything above `u32::MAX`.
fn valid_quantity(quantity: i64) -> Option<u32> {
    if quantity < 1 {
        return None;
    }
    Some(u32::try_from(quantity).unwrap_or(u32::MAX))
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line item for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Σ price × quantity over the current items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is incremented and
    /// every other field of the existing item is kept as-is. Otherwise a new
    /// item is appended. A quantity below 1 is ignored without notification;
    /// one above `u32::MAX` is clamped.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: i64,
        sink: &mut impl NotificationSink,
    ) {
        let Some(quantity) = valid_quantity(quantity) else {
            return;
        };

        if let Some(existing) = self.items.iter_mut().find(|item| item.id() == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            sink.notify(Notification::info(
                "Product updated in cart",
                format!(
                    "{} quantity updated to {}",
                    product.title, existing.quantity
                ),
            ));
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity,
            });
            sink.notify(Notification::info(
                "Product added to cart",
                format!("{} added to your cart", product.title),
            ));
        }
    }

    /// Remove the item for `product_id`, if present.
    pub fn remove_from_cart(&mut self, product_id: ProductId, sink: &mut impl NotificationSink) {
        let Some(index) = self.items.iter().position(|item| item.id() == product_id) else {
            return;
        };

        let removed = self.items.remove(index);
        sink.notify(Notification::info(
            "Product removed",
            format!("{} removed from your cart", removed.product.title),
        ));
    }

    /// Set the quantity for `product_id`.
    ///
    /// Quantities below 1 and unknown products are silently ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        let Some(quantity) = valid_quantity(quantity) else {
            return;
        };

        if let Some(item) = self.items.iter_mut().find(|item| item.id() == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove every item. Always notifies, even when already empty.
    pub fn clear_cart(&mut self, sink: &mut impl NotificationSink) {
        self.items.clear();
        sink.notify(Notification::info(
            "Cart cleared",
            "All items have been removed from your cart",
        ));
    }
}
