//! limit-yield - Binary Entry Point
//!
//! Runs one placement against in-memory collaborators and prints the
//! resulting ledger, claims, market balance and state root.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use limit_yield::assets::{AssetLedger, InMemoryAssetLedger};
use limit_yield::config::EngineConfig;
use limit_yield::engine::OrderEngine;
use limit_yield::market::InMemoryLendingMarket;
use limit_yield::types::amount::{display_units, to_base_units};
use limit_yield::types::{Address, PoolKey, Side};

#[derive(Parser)]
#[command(name = "limit-yield")]
#[command(about = "Place a yield-bearing limit order on an in-memory pool", long_about = None)]
struct Cli {
    /// JSON engine config; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order size in whole tokens (decimal string)
    #[arg(long, default_value = "1")]
    amount: String,

    /// Target tick, must be a multiple of the tick spacing
    #[arg(long, default_value_t = 120, allow_hyphen_values = true)]
    tick: i32,

    /// a-to-b sells currency0, b-to-a sells currency1
    #[arg(long, default_value_t = Side::AtoB)]
    side: Side,

    /// Decimals of the sell asset
    #[arg(long, default_value_t = 18)]
    decimals: u32,

    #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
    tick_spacing: i32,

    /// Pool fee in hundredths of a bip
    #[arg(long, default_value_t = 3000)]
    fee: u32,
}

const TOKEN_A: Address = Address::with_last_byte(0x0a);
const TOKEN_B: Address = Address::with_last_byte(0x0b);
const MARKET: Address = Address::with_last_byte(0xaa);
const CALLER: Address = Address::with_last_byte(0x01);

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.log_filter);

    let Some(amount) = to_base_units(&cli.amount, cli.decimals) else {
        bail!("invalid amount {:?} for {} decimals", cli.amount, cli.decimals);
    };

    let pool = PoolKey::new(TOKEN_A, TOKEN_B, cli.fee, cli.tick_spacing, Address::ZERO);
    let asset = pool.sell_token(cli.side);

    // Fund the caller with exactly the order size and approve the engine
    let mut assets = InMemoryAssetLedger::new();
    assets.mint(asset, CALLER, amount).context("funding caller")?;
    assets.approve(asset, CALLER, config.engine_account, amount);

    let mut engine = OrderEngine::new(config, assets, InMemoryLendingMarket::new(MARKET));
    let receipt = engine
        .place_order(CALLER, &pool, cli.tick, cli.side, amount)
        .context("placing order")?;
    engine.check_invariants().context("post-placement invariants")?;

    let id = receipt.order_id();
    println!("pool id:          {}", pool.id());
    println!("order id:         {id}");
    println!("sell token:       {asset}");
    println!("tick / side:      {} / {}", cli.tick, cli.side);
    println!(
        "limit_orders:     {} ({})",
        engine.limit_orders(pool.id(), cli.tick, cli.side),
        display_units(receipt.total_deposited, cli.decimals)
    );
    println!("claims_minted:    {}", engine.claims_minted(&id));
    println!("caller claims:    {}", engine.balance_of(CALLER, &id));
    println!("orders on pool:   {}", engine.resting_orders_in(pool.id()).count());
    println!("caller balance:   {}", engine.assets().balance_of(asset, CALLER));
    println!("market balance:   {}", engine.market_balance(asset));
    println!("state root:       0x{}", hex::encode(engine.state_root()?));
    Ok(())
}
