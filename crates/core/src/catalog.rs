//! Catalog records and listing filters.
//!
//! [`Product`] mirrors the JSON served by the product catalog API. The catalog
//! itself has no server-side filtering, so [`CatalogQuery`] narrows and orders
//! a fetched product list locally.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Number of products shown in the home page "featured" strip.
pub const FEATURED_COUNT: usize = 4;

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub rate: Decimal,
    pub count: u32,
}

/// A product as served by the catalog. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    PriceLowHigh,
    PriceHighLow,
    NameAz,
    NameZa,
}

impl SortOrder {
    /// All orders, in the order they are offered to the user.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::NameAz,
        Self::NameZa,
    ];

    /// Parse a query-string key. Unknown keys fall back to [`SortOrder::Default`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "price-low-high" => Self::PriceLowHigh,
            "price-high-low" => Self::PriceHighLow,
            "name-a-z" => Self::NameAz,
            "name-z-a" => Self::NameZa,
            _ => Self::Default,
        }
    }

    /// Query-string key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
            Self::NameAz => "name-a-z",
            Self::NameZa => "name-z-a",
        }
    }

    /// Human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Featured",
            Self::PriceLowHigh => "Price: Low to High",
            Self::PriceHighLow => "Price: High to Low",
            Self::NameAz => "Name: A to Z",
            Self::NameZa => "Name: Z to A",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::PriceLowHigh => a.price.cmp(&b.price),
            Self::PriceHighLow => b.price.cmp(&a.price),
            Self::NameAz => compare_titles(&a.title, &b.title),
            Self::NameZa => compare_titles(&b.title, &a.title),
        }
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filters applied to a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Exact category name; `None` shows every category.
    pub category: Option<String>,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    /// Build a query from raw query-string values, treating blanks as absent.
    #[must_use]
    pub fn from_params(category: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            category: non_blank(category),
            search: non_blank(search),
            sort: sort.map(SortOrder::from_key).unwrap_or_default(),
        }
    }

    /// Whether `product` passes the category and search filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                product.title.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    /// Filter and order a product list.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut products: Vec<Product> = products
            .into_iter()
            .filter(|p| self.matches(p))
            .collect();
        // sort_by is stable, so equal keys keep catalog order
        products.sort_by(|a, b| self.sort.compare(a, b));
        products
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// The first [`FEATURED_COUNT`] products, for the home page.
#[must_use]
pub fn featured(mut products: Vec<Product>) -> Vec<Product> {
    products.truncate(FEATURED_COUNT);
    products
}

/// Capitalize the first letter of a category name for display.
#[must_use]
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
