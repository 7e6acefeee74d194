//! Bloom CLI - Cart quotes, catalog browsing, account and checkout.
//!
//! # Usage
//!
//! ```bash
//! # Price a cart file offline
//! bloom quote cart.json
//!
//! # Browse the catalog
//! bloom products --search rose --page 2
//! bloom featured
//! bloom categories
//!
//! # Account
//! bloom login -e shopper@bloom.in -p secret
//! bloom whoami
//! bloom logout
//!
//! # Place an order for a cart file
//! bloom checkout cart.json
//! ```
//!
//! # Commands
//!
//! - `quote` - Price a cart file (no network)
//! - `products`, `featured`, `categories` - Catalog listings
//! - `login`, `register`, `logout`, `whoami`, `status` - Session management
//! - `checkout` - Place an order for a cart file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "bloom")]
#[command(author, version, about = "Bloom shopping client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a cart file without contacting the server
    Quote {
        /// Cart file (`{"items": [{"product": {...}, "quantity": 2}]}`)
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List products
    Products {
        /// Category id to filter by
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Minimum unit price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum unit price
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Sort order understood by the server (e.g. `price`, `-createdAt`)
        #[arg(long)]
        sort: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 12)]
        limit: u32,
    },
    /// List featured products
    Featured,
    /// List categories
    Categories,
    /// Log in and store the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and store the session
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Optional phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show where the client would start (home or auth)
    Status,
    /// Place an order for a cart file
    Checkout {
        /// Cart file in the same format as `quote`
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bloom_cli=info,bloom_client=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote { file, json } => commands::cart::quote(&file, json).await?,
        Commands::Products {
            category,
            search,
            min_price,
            max_price,
            sort,
            page,
            limit,
        } => {
            let mut query = bloom_client::ProductQuery::default()
                .price_range(min_price, max_price)
                .page(page, limit);
            query.category = category.map(Into::into);
            query.search = search;
            query.sort = sort;
            commands::catalog::products(&query).await?;
        }
        Commands::Featured => commands::catalog::featured().await?,
        Commands::Categories => commands::catalog::categories().await?,
        Commands::Login { email, password } => {
            commands::account::login(&email, password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => commands::account::register(&name, &email, password, phone.as_deref()).await?,
        Commands::Logout => commands::account::logout().await?,
        Commands::Whoami => commands::account::whoami().await?,
        Commands::Status => commands::account::status().await?,
        Commands::Checkout { file } => commands::cart::checkout(&file).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_products_defaults() {
        let cli = Cli::try_parse_from(["bloom", "products", "--search", "lily"]).unwrap();
        match cli.command {
            Commands::Products {
                search,
                page,
                limit,
                category,
                ..
            } => {
                assert_eq!(search.as_deref(), Some("lily"));
                assert_eq!(page, 1);
                assert_eq!(limit, 12);
                assert!(category.is_none());
            }
            _ => panic!("expected products command"),
        }
    }

    #[test]
    fn test_price_filters_parse_as_decimal() {
        let cli =
            Cli::try_parse_from(["bloom", "products", "--min-price", "99.50"]).unwrap();
        match cli.command {
            Commands::Products { min_price, .. } => {
                assert_eq!(min_price, Some(Decimal::new(9_950, 2)));
            }
            _ => panic!("expected products command"),
        }
    }

    #[test]
    fn test_quote_takes_file_and_json_flag() {
        let cli = Cli::try_parse_from(["bloom", "quote", "cart.json", "--json"]).unwrap();
        match cli.command {
            Commands::Quote { file, json } => {
                assert_eq!(file, PathBuf::from("cart.json"));
                assert!(json);
            }
            _ => panic!("expected quote command"),
        }
    }
}
