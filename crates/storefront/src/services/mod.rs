//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Demo account registration and login
//! - `checkout` - Simulated order placement

pub mod auth;
pub mod checkout;
