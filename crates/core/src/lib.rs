//! Bazaar Core - Shared domain library.
//!
//! This crate provides the domain types used by every Bazaar component:
//! - `storefront` - Server-rendered shop (catalog, cart, checkout, demo accounts)
//! - `cli` - Command-line tools for browsing the catalog and managing accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no file access. Anything stateful here (the [`Cart`]) is a plain
//! value owned by its caller.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`catalog`] - Product records and listing filters
//! - [`cart`] - The shopping cart and its operations
//! - [`notification`] - User feedback emitted by domain operations
//! - [`checkout`] - Checkout validation and order summary
//! - [`registration`] - Demo account registration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notification;
pub mod registration;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{CatalogQuery, Product, Rating, SortOrder};
pub use notification::{Notification, NotificationSink, Severity};
pub use types::*;
