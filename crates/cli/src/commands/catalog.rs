//! Catalog browsing commands.

use bazaar_core::{CatalogQuery, Product, ProductId};
use bazaar_storefront::catalog::CatalogClient;
use bazaar_storefront::config::CatalogConfig;
use tracing::info;

use super::CliError;

fn client() -> Result<CatalogClient, CliError> {
    let config = CatalogConfig::from_env()?;
    info!(catalog = %config.base_url, "Using catalog");
    Ok(CatalogClient::new(&config)?)
}

fn summary_line(product: &Product) -> String {
    format!(
        "{:>4}  {:>10}  {:<18}  {}",
        product.id.to_string(),
        product.price.to_string(),
        product.category,
        product.title
    )
}

/// List products with optional filters.
///
/// # Errors
///
/// Returns an error if the catalog cannot be reached.
pub async fn products(
    category: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
) -> Result<(), CliError> {
    let client = client()?;
    let query = CatalogQuery::from_params(category, search, sort);

    let products = match &query.category {
        Some(category) => client.products_in_category(category).await?,
        None => client.products().await?,
    };
    let products = query.apply(products);

    for product in &products {
        info!("{}", summary_line(product));
    }
    info!(count = products.len(), sort = query.sort.label(), "Done");
    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be
/// reached.
pub async fn product(id: i32) -> Result<(), CliError> {
    let product = client()?.product(ProductId::new(id)).await?;

    info!("{}", product.title);
    info!("  id:       {}", product.id);
    info!("  price:    {}", product.price);
    info!("  category: {}", product.category);
    info!(
        "  rating:   {} ({} reviews)",
        product.rating.rate, product.rating.count
    );
    info!("  image:    {}", product.image);
    info!("  {}", product.description);
    Ok(())
}

/// List category names.
///
/// # Errors
///
/// Returns an error if the catalog cannot be reached.
pub async fn categories() -> Result<(), CliError> {
    let categories = client()?.categories().await?;
    for category in &categories {
        info!("{category}");
    }
    info!(count = categories.len(), "Done");
    Ok(())
}
