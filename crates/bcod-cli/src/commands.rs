use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};

use bcod_client::{CartReconciler, CheckoutRequest, PickupLocation, StoreClient};
use bcod_core::cart::CartSnapshot;
use bcod_core::{QuerySpec, SortKey};

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Free-text search term.
    #[arg(long)]
    pub search: Option<String>,
    /// Restrict to a category id.
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// One of: name_asc, name_desc, price_low, price_high, rating_high,
    /// best_seller, latest, oldest.
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub min_price: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    /// Minimum review rating, 0-5.
    #[arg(long)]
    pub min_rating: Option<u8>,
    /// Only products with stock available.
    #[arg(long)]
    pub in_stock: bool,
}

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub action: CartAction,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the current cart.
    Show,
    /// Add a product to the cart.
    Add {
        product_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Increase a line item's quantity by one.
    Inc { cart_item_id: i64 },
    /// Decrease a line item's quantity by one (never below one).
    Dec { cart_item_id: i64 },
    /// Remove a line item.
    Rm { cart_item_id: i64 },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Handover spot: "kantin payung", "LKC", or "Depan Admisi".
    #[arg(long)]
    pub location: String,
    /// Pickup date, YYYY-MM-DD.
    #[arg(long)]
    pub date: String,
    /// Pickup time, HH:MM.
    #[arg(long)]
    pub time: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
}

pub async fn products(client: &Arc<StoreClient>, args: ProductsArgs) -> anyhow::Result<()> {
    let mut spec = QuerySpec::default()
        .with_search(args.search)
        .with_category(args.category);
    if let Some(sort) = &args.sort {
        let key = SortKey::parse(sort);
        if key == SortKey::Default && sort != "default" {
            bail!("unknown sort key \"{sort}\"");
        }
        spec = spec.with_sort(key);
    }
    let min_price = args
        .min_price
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("--min-price must be a decimal amount")?;
    let max_price = args
        .max_price
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("--max-price must be a decimal amount")?;
    if min_price.is_some() || max_price.is_some() {
        spec = spec.with_price_range(min_price, max_price);
    }
    if let Some(min_rating) = args.min_rating {
        spec = spec.with_min_rating(Some(min_rating));
    }
    if args.in_stock {
        spec = spec.with_in_stock(true);
    }
    // Page last: the setters above all reset it to 1.
    spec = spec.with_page(args.page);

    let page = client.fetch_page(&spec).await?;
    if page.items.is_empty() {
        println!("no results");
        return Ok(());
    }
    for product in &page.items {
        println!(
            "#{:<6} {:<40} {:>10}  stock {:<4} rating {:.1}",
            product.product_id,
            product.name,
            product.price,
            product.stock,
            product.rating_or_zero()
        );
    }
    println!(
        "page {}/{} ({} total)",
        page.current_page, page.last_page, page.total
    );
    Ok(())
}

pub async fn categories(client: &Arc<StoreClient>) -> anyhow::Result<()> {
    for category in client.categories().await? {
        println!("#{:<4} {}", category.category_id, category.name);
    }
    Ok(())
}

pub async fn cart(client: &Arc<StoreClient>, args: CartArgs) -> anyhow::Result<()> {
    let cart = CartReconciler::new(client.clone());
    let snapshot = match args.action {
        CartAction::Show => cart.refresh().await?,
        CartAction::Add {
            product_id,
            quantity,
        } => cart.add(product_id, quantity).await?,
        CartAction::Inc { cart_item_id } => {
            cart.refresh().await?;
            cart.increment(cart_item_id).await?
        }
        CartAction::Dec { cart_item_id } => {
            cart.refresh().await?;
            cart.decrement(cart_item_id).await?
        }
        CartAction::Rm { cart_item_id } => cart.remove(cart_item_id).await?,
    };
    print_cart(&snapshot);
    Ok(())
}

pub async fn checkout(client: &Arc<StoreClient>, args: CheckoutArgs) -> anyhow::Result<()> {
    let location = PickupLocation::parse(&args.location).with_context(|| {
        format!(
            "unknown location \"{}\" (expected \"kantin payung\", \"LKC\", or \"Depan Admisi\")",
            args.location
        )
    })?;
    let order_date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .context("--date must be YYYY-MM-DD")?;
    let order_time =
        NaiveTime::parse_from_str(&args.time, "%H:%M").context("--time must be HH:MM")?;

    let confirmation = client
        .checkout(&CheckoutRequest {
            location,
            order_date,
            order_time,
        })
        .await?;

    println!("order #{} placed", confirmation.order_id);
    println!("total: {}", confirmation.total_amount);
    if let Some(link) = &confirmation.whatsapp_link {
        println!("seller chat: {link}");
    }
    Ok(())
}

pub async fn login(client: &Arc<StoreClient>, args: &LoginArgs) -> anyhow::Result<()> {
    client.login(&args.username, &args.password).await?;
    println!("logged in as {}", args.username);
    Ok(())
}

pub async fn logout(client: &Arc<StoreClient>) -> anyhow::Result<()> {
    client.logout().await;
    println!("logged out");
    Ok(())
}

fn print_cart(snapshot: &CartSnapshot) {
    if snapshot.is_empty() {
        println!("cart is empty");
        return;
    }
    for item in &snapshot.items {
        println!(
            "item #{:<6} {:<40} x{:<3} @ {}",
            item.cart_item_id, item.product_name, item.quantity, item.price
        );
    }
    println!("{} items, subtotal {}", snapshot.total_items, snapshot.subtotal);
}
