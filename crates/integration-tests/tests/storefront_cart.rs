//! Integration tests for the session cart.
//!
//! Every mutation is a form POST that redirects back to a page; the client
//! follows the redirect, so notifications show up in the returned body.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use bazaar_integration_tests::TestContext;

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_adding_same_product_twice_merges_quantities() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.add_to_cart(18, 2).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product added to cart"));
    assert!(body.contains("Classic Ceramic Mug added to your cart"));

    let (_, body) = ctx.add_to_cart(18, 3).await.unwrap();
    assert!(body.contains("Product updated in cart"));
    assert!(body.contains("Classic Ceramic Mug quantity updated to 5"));
    assert!(body.contains("$50.00"));

    assert_eq!(ctx.cart_count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_add_defaults_to_quantity_one() {
    let ctx = TestContext::new().await.unwrap();

    ctx.post("/cart/add", &[("product_id", "9")]).await.unwrap();
    assert_eq!(ctx.cart_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_add_with_non_positive_quantity_is_ignored() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx.add_to_cart(9, 0).await.unwrap();
    assert!(!body.contains("Product added to cart"));
    assert_eq!(ctx.cart_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_unknown_product_reports_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx.add_to_cart(999, 1).await.unwrap();
    assert!(body.contains("Product not found"));
    assert_eq!(ctx.cart_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_redirects_to_local_return_path_only() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .no_redirect
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "1"), ("return_to", "/products/1")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/products/1");

    let response = ctx
        .no_redirect
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "1"), ("return_to", "https://evil.example/")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/cart");
    assert_eq!(ctx.cart_count().await.unwrap(), 2);
}

// =============================================================================
// Update / Remove / Clear
// =============================================================================

#[tokio::test]
async fn test_update_quantity_ignores_values_below_one() {
    let ctx = TestContext::new().await.unwrap();
    ctx.add_to_cart(1, 2).await.unwrap();

    ctx.post("/cart/update", &[("product_id", "1"), ("quantity", "0")])
        .await
        .unwrap();
    assert_eq!(ctx.cart_count().await.unwrap(), 2);

    ctx.post("/cart/update", &[("product_id", "1"), ("quantity", "-3")])
        .await
        .unwrap();
    assert_eq!(ctx.cart_count().await.unwrap(), 2);

    let (_, body) = ctx
        .post("/cart/update", &[("product_id", "1"), ("quantity", "4")])
        .await
        .unwrap();
    assert_eq!(ctx.cart_count().await.unwrap(), 4);
    assert!(body.contains("$439.80"));
}

#[tokio::test]
async fn test_update_unknown_product_changes_nothing() {
    let ctx = TestContext::new().await.unwrap();
    ctx.add_to_cart(2, 1).await.unwrap();

    ctx.post("/cart/update", &[("product_id", "9"), ("quantity", "3")])
        .await
        .unwrap();
    assert_eq!(ctx.cart_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_from_cart() {
    let ctx = TestContext::new().await.unwrap();
    ctx.add_to_cart(1, 1).await.unwrap();
    ctx.add_to_cart(9, 2).await.unwrap();

    let (status, body) = ctx
        .post("/cart/remove", &[("product_id", "9")])
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product removed"));
    assert!(body.contains("removed from your cart"));
    assert!(body.contains("$109.95"));
    assert_eq!(ctx.cart_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_from_empty_cart_is_silent() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .post("/cart/remove", &[("product_id", "1")])
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("Product removed"));
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_clear_cart_always_notifies() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx.post("/cart/clear", &[]).await.unwrap();
    assert!(body.contains("Cart cleared"));
    assert!(body.contains("All items have been removed from your cart"));

    ctx.add_to_cart(1, 1).await.unwrap();
    ctx.add_to_cart(2, 1).await.unwrap();
    let (_, body) = ctx.post("/cart/clear", &[]).await.unwrap();
    assert!(body.contains("Cart cleared"));
    assert_eq!(ctx.cart_count().await.unwrap(), 0);
}

// =============================================================================
// Session Behavior
// =============================================================================

#[tokio::test]
async fn test_notifications_are_shown_once() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx.add_to_cart(1, 1).await.unwrap();
    assert!(body.contains("Product added to cart"));

    let (_, body) = ctx.get("/cart").await.unwrap();
    assert!(!body.contains("Product added to cart"));
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let first = TestContext::new().await.unwrap();
    first.add_to_cart(1, 3).await.unwrap();

    let stranger = reqwest::Client::new();
    let body = stranger
        .get(first.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(">0<"));
    assert_eq!(first.cart_count().await.unwrap(), 3);
}
