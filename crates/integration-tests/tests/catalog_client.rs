//! Integration tests for the catalog client against a fake catalog.

#![allow(clippy::unwrap_used)]

use bazaar_core::{ProductId, Rating};
use bazaar_integration_tests::{FakeCatalog, spawn_fake_catalog};
use bazaar_storefront::catalog::{CatalogClient, CatalogError};
use bazaar_storefront::config::CatalogConfig;

async fn client() -> (CatalogClient, FakeCatalog) {
    let fake = FakeCatalog::default();
    let url = spawn_fake_catalog(&fake).await.unwrap();
    let config = CatalogConfig::with_base_url(&url).unwrap();
    (CatalogClient::new(&config).unwrap(), fake)
}

#[tokio::test]
async fn test_products_are_decoded() {
    let (client, _) = client().await;

    let products = client.products().await.unwrap();
    assert_eq!(products.len(), 5);

    let backpack = products.first().unwrap();
    assert_eq!(backpack.id, ProductId::new(1));
    assert_eq!(backpack.price.to_string(), "$109.95");
    assert_eq!(backpack.category, "men's clothing");
    assert_eq!(backpack.rating.count, 120);
}

#[tokio::test]
async fn test_missing_rating_defaults() {
    let (client, _) = client().await;

    let mug = client.product(ProductId::new(18)).await.unwrap();
    assert_eq!(mug.title, "Classic Ceramic Mug");
    assert_eq!(mug.rating, Rating::default());
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (client, _) = client().await;

    let err = client.product(ProductId::new(999)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(999)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_category_name_is_percent_encoded() {
    let (client, fake) = client().await;

    let products = client.products_in_category("men's clothing").await.unwrap();
    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
    assert_eq!(
        fake.requested_paths(),
        vec!["/products/category/men%27s%20clothing"]
    );
}

#[tokio::test]
async fn test_categories() {
    let (client, _) = client().await;

    let categories = client.categories().await.unwrap();
    assert_eq!(categories, vec!["men's clothing", "jewelery", "electronics"]);
}

#[tokio::test]
async fn test_successful_responses_are_cached() {
    let (client, fake) = client().await;

    client.products().await.unwrap();
    client.products().await.unwrap();
    client.product(ProductId::new(1)).await.unwrap();
    client.product(ProductId::new(1)).await.unwrap();
    assert_eq!(fake.hits(), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let (client, fake) = client().await;
    fake.fail();

    let err = client.products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    assert!(client.products().await.is_err());
    assert_eq!(fake.hits(), 2);
}
