//! Integration tests for Bazaar.
//!
//! Each test spins up two servers on ephemeral ports: a fake product catalog
//! serving fixed fixtures, and the real storefront router pointed at it. Tests
//! then drive the storefront over HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use bazaar_storefront::config::{CatalogConfig, StorefrontConfig};
use bazaar_storefront::state::AppState;
use reqwest::cookie::Jar;
use serde_json::{Value, json};

/// Boxed error for test setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Fake Catalog
// =============================================================================

/// Products served by the fake catalog.
#[must_use]
pub fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://img.example/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }),
        json!({
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://img.example/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }),
        json!({
            "id": 5,
            "title": "Legends Naga Dragon Station Chain Bracelet",
            "price": 695,
            "description": "Inspired by the mythical water dragon.",
            "category": "jewelery",
            "image": "https://img.example/5.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        }),
        json!({
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility, fast data transfers.",
            "category": "electronics",
            "image": "https://img.example/9.jpg",
            "rating": { "rate": 3.3, "count": 203 }
        }),
        json!({
            "id": 18,
            "title": "Classic Ceramic Mug",
            "price": 10,
            "description": "Holds coffee. Also tea.",
            "category": "electronics",
            "image": "https://img.example/18.jpg"
        }),
    ]
}

/// Handle to the fake catalog's counters and failure switch.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    hits: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request paths received so far, still percent-encoded.
    #[must_use]
    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Make every following request answer 500.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn record(&self, uri: &Uri) -> Result<(), Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(uri.path().to_string());
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
        Ok(())
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/products", get(all_products))
            .route("/products/categories", get(categories))
            .route("/products/category/{category}", get(products_in_category))
            .route("/products/{id}", get(product))
            .with_state(self.clone())
    }
}

async fn all_products(State(fake): State<FakeCatalog>, uri: Uri) -> Response {
    if let Err(response) = fake.record(&uri) {
        return response;
    }
    Json(fixture_products()).into_response()
}

async fn categories(State(fake): State<FakeCatalog>, uri: Uri) -> Response {
    if let Err(response) = fake.record(&uri) {
        return response;
    }
    let mut names: Vec<String> = fixture_products()
        .iter()
        .filter_map(|p| p["category"].as_str().map(String::from))
        .collect();
    names.dedup();
    Json(names).into_response()
}

async fn products_in_category(
    State(fake): State<FakeCatalog>,
    uri: Uri,
    Path(category): Path<String>,
) -> Response {
    if let Err(response) = fake.record(&uri) {
        return response;
    }
    let products: Vec<Value> = fixture_products()
        .into_iter()
        .filter(|p| p["category"] == category.as_str())
        .collect();
    Json(products).into_response()
}

/// Unknown IDs answer 200 with an empty body, like the public catalog.
async fn product(
    State(fake): State<FakeCatalog>,
    uri: Uri,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = fake.record(&uri) {
        return response;
    }
    let found = fixture_products()
        .into_iter()
        .find(|p| p["id"].to_string() == id);
    match found {
        Some(product) => Json(product).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// Serve a router on an ephemeral localhost port.
async fn serve(app: Router) -> Result<SocketAddr, BoxError> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// Start only the fake catalog. Returns its base URL.
///
/// # Errors
///
/// Returns an error if no port can be bound.
pub async fn spawn_fake_catalog(fake: &FakeCatalog) -> Result<String, BoxError> {
    let addr = serve(fake.router()).await?;
    Ok(format!("http://{addr}"))
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront wired to a fake catalog.
pub struct TestContext {
    /// Follows redirects, keeps cookies.
    pub client: reqwest::Client,
    /// Same cookie jar, but stops at redirects so `Location` can be checked.
    pub no_redirect: reqwest::Client,
    pub base_url: String,
    pub catalog: FakeCatalog,
    pub users_file: PathBuf,
}

impl TestContext {
    /// Start the fake catalog and the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if a server cannot start or a client cannot be built.
    pub async fn new() -> Result<Self, BoxError> {
        let catalog = FakeCatalog::default();
        let catalog_url = spawn_fake_catalog(&catalog).await?;

        let users_file = std::env::temp_dir()
            .join(format!("bazaar-it-{}", uuid::Uuid::new_v4()))
            .join("users.json");

        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
            catalog: CatalogConfig::with_base_url(&catalog_url)?,
            users_file: users_file.clone(),
            checkout_delay: Duration::ZERO,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = serve(bazaar_storefront::app(AppState::new(config)?)).await?;

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        let no_redirect = reqwest::Client::builder()
            .cookie_provider(jar)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            no_redirect,
            base_url: format!("http://{addr}"),
            catalog,
            users_file,
        })
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page and return status and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, path: &str) -> Result<(StatusCode, String), BoxError> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok((response.status(), response.text().await?))
    }

    /// POST a form, follow redirects, and return the final status and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<(StatusCode, String), BoxError> {
        let response = self.client.post(self.url(path)).form(form).send().await?;
        Ok((response.status(), response.text().await?))
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_to_cart(
        &self,
        product_id: i32,
        quantity: i64,
    ) -> Result<(StatusCode, String), BoxError> {
        let id = product_id.to_string();
        let quantity = quantity.to_string();
        self.post("/cart/add", &[("product_id", &id), ("quantity", &quantity)])
            .await
    }

    /// Current cart badge count.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the badge cannot be parsed.
    pub async fn cart_count(&self) -> Result<u32, BoxError> {
        let (_, body) = self.get("/cart/count").await?;
        let count = body
            .split('>')
            .nth(1)
            .and_then(|rest| rest.split('<').next())
            .ok_or("malformed cart badge")?;
        Ok(count.trim().parse()?)
    }
}
