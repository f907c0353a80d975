//! Mundo Market — CLI Entry Point
//!
//! Small storefront front-end over the marketplace client. Wiring:
//! 1. Load config.toml + validate
//! 2. Init tracing (env-filter, level from config)
//! 3. Build the wallet session from MUNDO_WALLET_KEY (connected when set)
//! 4. Build the client over the Celo ledger factory
//! 5. Run one command and print the result
//!
//! Commands: catalog, categories, item <id>, buy <id>, orders [address],
//! add <name> <category> <image-url> <price> <stock> <description>,
//! owner, check-token, allow-token.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::chain::CeloLedgerFactory;
use adapters::notify::TracingSink;
use adapters::session::{SessionRequest, WatchSession};
use alloy::signers::local::PrivateKeySigner;
use domain::catalog::Category;
use domain::network::ALFAJORES_CHAIN_ID;
use ports::wallet::SessionState;
use usecases::MarketplaceClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config =
        config::loader::load_config("config.toml").context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    // Optional --chain <id> ahead of the command; defaults to the testnet.
    let mut chain_id = ALFAJORES_CHAIN_ID;
    if args.first().map(String::as_str) == Some("--chain") {
        if args.len() < 2 {
            bail!("--chain requires a chain id");
        }
        chain_id = args[1].parse().context("--chain expects an integer")?;
        args.drain(..2);
    }

    let session_state = match std::env::var(adapters::chain::provider::WALLET_KEY_ENV) {
        Ok(key) => {
            let signer: PrivateKeySigner = key
                .trim()
                .parse()
                .context("MUNDO_WALLET_KEY is not a valid private key")?;
            SessionState::connected(chain_id, format!("{:#x}", signer.address()))
        }
        Err(_) => SessionState::default(),
    };

    let (_session_tx, session) = WatchSession::channel(session_state);
    let session = Arc::new(session);

    let client = MarketplaceClient::new(
        Arc::clone(&session) as Arc<dyn ports::wallet::WalletSession>,
        Arc::new(CeloLedgerFactory),
        config.profile_table(),
    )
    .with_progress(Arc::new(TracingSink));

    let outcome = run_command(&client, &args).await;

    // A headless CLI cannot open a wallet modal or switch chains itself;
    // translate recorded provider requests into actionable hints.
    for request in session.take_requests() {
        match request {
            SessionRequest::Connect => {
                warn!("No wallet session — set MUNDO_WALLET_KEY to a funded private key");
            }
            SessionRequest::SwitchChain(target) => {
                warn!(target, "Unsupported network — rerun with --chain {target}");
            }
        }
    }

    outcome
}

async fn run_command(client: &MarketplaceClient, args: &[String]) -> Result<()> {
    let command = args.first().map(String::as_str).unwrap_or("catalog");

    match command {
        "catalog" => {
            let items = client.all_items().await?;
            if items.is_empty() {
                println!("No items listed.");
            }
            for item in items {
                println!(
                    "#{:<4} {:<24} {:<12} {:>12}  stock {:>3}  {}",
                    item.id, item.name, item.category, item.price, item.stock, item.description
                );
            }
        }
        "categories" => {
            for category in [Category::Electronics, Category::Clothing, Category::Pets] {
                let items = client.items_in(category).await?;
                println!("{category} ({})", items.len());
                for item in items {
                    println!("  #{:<4} {:<24} {:>12}", item.id, item.name, item.price);
                }
            }
        }
        "item" => {
            let id = parse_id(args)?;
            let item = client.item(id).await?;
            println!("#{} {}", item.id, item.name);
            println!("  category: {}", item.category);
            println!("  price:    {}", item.price);
            println!("  stock:    {}", item.stock);
            println!("  rating:   {}", item.rating);
            println!("  image:    {}", item.image_url);
            println!("  {}", item.description);
        }
        "buy" => {
            let id = parse_id(args)?;
            let receipt = client.buy_item(id).await?;
            println!(
                "Purchase successful: {} (block {})",
                receipt.tx_hash, receipt.block_number
            );
        }
        "orders" => {
            let orders = match args.get(1) {
                Some(address) => client.orders_for(address).await?,
                None => client.my_orders().await?,
            };
            if orders.is_empty() {
                println!("No orders.");
            }
            for order in orders {
                println!(
                    "{}  #{:<4} {:<24} {:>12}",
                    order.placed_at.format("%Y-%m-%d %H:%M:%S"),
                    order.item.id,
                    order.item.name,
                    order.item.price
                );
            }
        }
        "add" => {
            let [name, category, image_url, price, stock, description] = args
                .get(1..7)
                .and_then(|s| <&[String; 6]>::try_from(s).ok())
                .context(
                    "usage: add <name> <category> <image-url> <price> <stock> <description>",
                )?;
            let category = Category::parse(category)
                .with_context(|| format!("Unknown category `{category}` (electronics/clothing/pets)"))?;
            let stock = stock.parse().context("stock must be a non-negative integer")?;
            let receipt = client
                .list_item(name, category, image_url, price, stock, description)
                .await?;
            println!("Product added: {}", receipt.tx_hash);
        }
        "owner" => {
            println!("{}", client.owner().await?);
        }
        "check-token" => {
            let allowed = client.is_payment_token_allowed().await?;
            println!("payment token allowed: {allowed}");
        }
        "allow-token" => {
            let receipt = client.allow_payment_token().await?;
            println!("Token allow-listed: {}", receipt.tx_hash);
        }
        other => bail!("Unknown command `{other}`"),
    }

    Ok(())
}

fn parse_id(args: &[String]) -> Result<u64> {
    args.get(1)
        .context("expected an item id")?
        .parse()
        .context("item id must be a non-negative integer")
}
