//! Integration tests for registration, login and the welcome page.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_integration_tests::TestContext;

async fn register(ctx: &TestContext, name: &str, email: &str, password: &str) -> (StatusCode, String) {
    ctx.post(
        "/auth/register",
        &[
            ("name", name),
            ("email", email),
            ("password", password),
            ("confirm_password", password),
        ],
    )
    .await
    .unwrap()
}

async fn login(ctx: &TestContext, email: &str, password: &str) -> (StatusCode, String) {
    ctx.post("/auth/login", &[("email", email), ("password", password)])
        .await
        .unwrap()
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_then_redirect_to_login() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = register(&ctx, "Ada", "ada@example.com", "engine").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Registration successful! Please login."));
    assert!(body.contains(r#"action="/auth/login""#));

    let stored: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&ctx.users_file).unwrap()).unwrap();
    assert_eq!(stored[0]["name"], "Ada");
    assert_eq!(stored[0]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_register_rejects_password_mismatch() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .post(
            "/auth/register",
            &[
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("password", "engine"),
                ("confirm_password", "engines"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Passwords do not match"));
    assert!(body.contains(r#"value="ada@example.com""#));
    assert!(!ctx.users_file.exists());
}

#[tokio::test]
async fn test_register_requires_every_field() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .post("/auth/register", &[("name", "Ada"), ("email", "ada@example.com")])
        .await
        .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("All fields are required"));
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = register(&ctx, "Ada", "not-an-email", "engine").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Please enter a valid email address"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();
    register(&ctx, "Ada", "ada@example.com", "engine").await;

    let (status, body) = register(&ctx, "Imposter", "ADA@example.com", "other").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Email already registered"));
}

// =============================================================================
// Login / Welcome / Logout
// =============================================================================

#[tokio::test]
async fn test_login_shows_welcome_page() {
    let ctx = TestContext::new().await.unwrap();
    register(&ctx, "Ada", "ada@example.com", "engine").await;

    let (status, body) = login(&ctx, "ada@example.com", "engine").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Welcome, Ada!"));
    assert!(body.contains("Login successful!"));

    // Already logged in: the login page forwards to the welcome page.
    let (_, body) = ctx.get("/auth/login").await.unwrap();
    assert!(body.contains("Welcome, Ada!"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await.unwrap();
    register(&ctx, "Ada", "ada@example.com", "engine").await;

    let (status, body) = login(&ctx, "ada@example.com", "difference").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Login failed"));
    assert!(body.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_login_with_unknown_or_malformed_email_is_unauthorized() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = login(&ctx, "nobody@example.com", "engine").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&ctx, "nobody", "engine").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_welcome_requires_login() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.no_redirect.get(ctx.url("/welcome")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/auth/login");
}

#[tokio::test]
async fn test_logout_forgets_user_but_keeps_cart() {
    let ctx = TestContext::new().await.unwrap();
    register(&ctx, "Ada", "ada@example.com", "engine").await;
    login(&ctx, "ada@example.com", "engine").await;
    ctx.add_to_cart(1, 2).await.unwrap();

    let (status, body) = ctx.post("/auth/logout", &[]).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/auth/login""#));

    let response = ctx.no_redirect.get(ctx.url("/welcome")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ctx.cart_count().await.unwrap(), 2);
}
