//! Product catalog API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP GET, no authentication
//! - The catalog is the source of truth - nothing is stored locally
//! - In-memory caching via `moka` for successful responses (configurable TTL)
//! - Failures are returned as-is: never cached, never retried
//!
//! # Endpoints
//!
//! ```text
//! GET /products                      - all products
//! GET /products/{id}                 - one product
//! GET /products/category/{category}  - products in a category
//! GET /products/categories           - category names
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let product = client.product(ProductId::new(1)).await?;
//! ```

mod cache;

use std::sync::Arc;

use bazaar_core::{Product, ProductId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;

use cache::{CacheKey, CacheValue};

/// Maximum number of cached responses.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned {status} for {path}")]
    Status { status: u16, path: String },

    /// The requested product does not exist.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether this error means "no such product" rather than a failed call.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bazaar-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Issue a GET and decode the body.
    ///
    /// Returns `Ok(None)` for an empty or `null` body, which is how the public
    /// catalog answers unknown product IDs.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, path = %path, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        match serde_json::from_str(trimmed) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %trimmed.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Fetch a list endpoint, treating an empty body as an empty list.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, CatalogError> {
        Ok(self.get_json(path).await?.unwrap_or_default())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_list("/products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog does not know the ID
    /// (404 or empty body), or another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = match self.get_json(&format!("/products/{id}")).await {
            Ok(Some(product)) => product,
            Ok(None) | Err(CatalogError::Status { status: 404, .. }) => {
                return Err(CatalogError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::Category(category.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let path = format!("/products/category/{}", urlencoding::encode(category));
        let products: Vec<Product> = self.get_list(&path).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get all category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self.get_list("/products/categories").await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(CatalogError::NotFound(ProductId::new(1)).is_not_found());
        assert!(
            !CatalogError::Status {
                status: 500,
                path: "/products".into()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let config = CatalogConfig::with_base_url("http://127.0.0.1:9/api/").unwrap();
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(client.inner.base_url, "http://127.0.0.1:9/api");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_http_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let config = CatalogConfig::with_base_url("http://127.0.0.1:9").unwrap();
        let client = CatalogClient::new(&config).unwrap();
        let err = client.products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
