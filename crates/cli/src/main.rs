//! Bazaar CLI - Catalog browsing and demo account tools.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered and sorted
//! bazaar catalog products --category electronics --search ssd --sort price-low-high
//!
//! # Show one product
//! bazaar catalog product 3
//!
//! # List categories
//! bazaar catalog categories
//!
//! # Manage demo accounts in USERS_FILE
//! bazaar users list
//! bazaar users register --name "Ada" --email ada@example.com --password secret
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_BASE_URL` - Product catalog API (default: <https://fakestoreapi.com>)
//! - `USERS_FILE` - Demo account file (default: data/users.json)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage demo accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive match on title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order (`default`, `price-low-high`, `price-high-low`, `name-a-z`, `name-z-a`)
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one product
    Product {
        /// Product ID
        id: i32,
    },
    /// List category names
    Categories,
}

#[derive(Subcommand)]
enum UsersAction {
    /// List registered accounts
    List,
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (stored as given)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before any config is read
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Products {
                category,
                search,
                sort,
            } => {
                commands::catalog::products(
                    category.as_deref(),
                    search.as_deref(),
                    sort.as_deref(),
                )
                .await?;
            }
            CatalogAction::Product { id } => commands::catalog::product(id).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list().await?,
            UsersAction::Register {
                name,
                email,
                password,
            } => commands::users::register(name, email, password).await?,
        },
    }
    Ok(())
}
