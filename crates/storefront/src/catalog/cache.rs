//! Cache types for catalog API responses.

use bazaar_core::{Product, ProductId};

/// Cache key, one per catalog endpoint (and argument).
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
    Category(String),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<String>),
}
