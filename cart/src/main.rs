//! Session cart CLI
//!
//! Keeps a shopping cart in a session directory between invocations.
//!
//! ```bash
//! session-cart catalog      # list products
//! session-cart add 1        # add product 1, then show the cart
//! session-cart delete 1     # remove product 1
//! session-cart cart         # show the cart
//! session-cart open /       # render a route (the root redirects to the catalog)
//! session-cart clear        # forget the stored cart
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use session_cart::{
    render_cart, render_catalog, CartConfig, CartController, CartError, CartPersistence,
    ProductCatalog, ProductId, Route,
};
use session_cart_runtime::FileSessionStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "session-cart")]
#[command(author, version, about = "Shopping cart kept in a session directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products in the catalog
    Catalog,
    /// Show the cart
    Cart,
    /// Add one unit of a catalog product to the cart
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product from the cart
    Delete {
        /// Product id
        id: ProductId,
    },
    /// Remove the stored cart
    Clear,
    /// Render the screen for a route path
    Open {
        /// Route path (`/`, `catalog`, `cart`)
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_cart=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CartConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    run(cli.command, &config).await
}

async fn run(command: Commands, config: &CartConfig) -> anyhow::Result<()> {
    let storage = FileSessionStorage::open(&config.session_dir).with_context(|| {
        format!("Failed to open session directory {}", config.session_dir.display())
    })?;
    let persistence = CartPersistence::with_key(storage, config.storage_key.clone());

    if matches!(command, Commands::Clear) {
        persistence.clear()?;
        print!("{}", render_cart(&session_cart::CartState::new()));
        return Ok(());
    }

    let controller = CartController::new(persistence, config.restore_policy)?;

    match command {
        Commands::Catalog => show_catalog(config).await?,
        Commands::Cart => print!("{}", render_cart(&controller.cart_items().await)),
        Commands::Add { id } => {
            let catalog = config.catalog()?;
            let product = catalog
                .product(id)
                .await?
                .ok_or(CartError::ProductNotFound(id))?;
            tracing::info!(product_id = %id, name = %product.name, "Adding product");
            controller.add_product(product).await?;
            print!("{}", render_cart(&controller.cart_items().await));
        },
        Commands::Delete { id } => {
            controller.delete_product(id).await?;
            print!("{}", render_cart(&controller.cart_items().await));
        },
        Commands::Open { path } => match Route::parse(&path) {
            Some(Route::Catalog) => show_catalog(config).await?,
            Some(Route::Cart) => print!("{}", render_cart(&controller.cart_items().await)),
            None => anyhow::bail!("No screen at path '{path}'"),
        },
        Commands::Clear => {},
    }

    Ok(())
}

async fn show_catalog(config: &CartConfig) -> anyhow::Result<()> {
    let products = config.catalog()?.products().await?;
    print!("{}", render_catalog(&products));
    Ok(())
}
