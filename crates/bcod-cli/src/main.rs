mod commands;
mod token_file;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bcod_client::StoreClient;
use bcod_core::load_app_config;

use crate::token_file::FileTokenStore;

#[derive(Debug, Parser)]
#[command(name = "bcod")]
#[command(about = "B-COD campus marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog with filters, sorting, and pagination.
    Products(commands::ProductsArgs),
    /// List the product categories.
    Categories,
    /// Inspect and mutate the shopping cart.
    Cart(commands::CartArgs),
    /// Place a cash-on-delivery order for the current cart.
    Checkout(commands::CheckoutArgs),
    /// Sign in and persist the session token.
    Login(commands::LoginArgs),
    /// Sign out and discard the session token.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let client = Arc::new(StoreClient::new(&config, tokens)?);

    let cli = Cli::parse();
    match cli.command {
        Commands::Products(args) => commands::products(&client, args).await,
        Commands::Categories => commands::categories(&client).await,
        Commands::Cart(args) => commands::cart(&client, args).await,
        Commands::Checkout(args) => commands::checkout(&client, args).await,
        Commands::Login(args) => commands::login(&client, &args).await,
        Commands::Logout => commands::logout(&client).await,
    }
}
