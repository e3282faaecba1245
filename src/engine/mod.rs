//! Order engine for limit-yield.
//!
//! ## Design Principles
//!
//! 1. **Atomicity**: a placement either applies every effect or none
//! 2. **Exact Math**: checked `u128` everywhere, no floating point
//! 3. **Synchronous Execution**: one placement at a time, no async
//! 4. **Injected Collaborators**: asset ledger and lending market are
//!    type parameters, so tests swap in fakes without dynamic dispatch
//!
//! ## Example
//!
//! ```
//! use limit_yield::assets::{AssetLedger, InMemoryAssetLedger};
//! use limit_yield::config::EngineConfig;
//! use limit_yield::engine::OrderEngine;
//! use limit_yield::market::InMemoryLendingMarket;
//! use limit_yield::types::{Address, PoolKey, Side};
//!
//! let config = EngineConfig::default();
//! let token_a = Address::with_last_byte(0x0a);
//! let token_b = Address::with_last_byte(0x0b);
//! let alice = Address::with_last_byte(0x01);
//!
//! let mut assets = InMemoryAssetLedger::new();
//! assets.mint(token_a, alice, 1_000).unwrap();
//! assets.approve(token_a, alice, config.engine_account, 1_000);
//!
//! let market = InMemoryLendingMarket::new(Address::with_last_byte(0xaa));
//! let mut engine = OrderEngine::new(config, assets, market);
//!
//! let pool = PoolKey::new(token_a, token_b, 3000, 60, Address::ZERO);
//! let receipt = engine.place_order(alice, &pool, 120, Side::AtoB, 400).unwrap();
//!
//! assert_eq!(receipt.total_deposited, 400);
//! assert_eq!(engine.limit_orders(pool.id(), 120, Side::AtoB), 400);
//! assert_eq!(engine.market_balance(token_a), 400);
//! ```

mod order_engine;

pub use order_engine::{order_id, sell_token, OrderEngine};
