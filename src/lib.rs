//! # limit-yield
//!
//! Accounting core for resting limit orders on a concentrated-liquidity
//! AMM, with idle capital parked in a lending market until filled.
//!
//! ## Architecture
//!
//! - **Types**: addresses, pool keys, ids, sides, ticks, amounts, receipts
//! - **Assets**: the fungible-asset ledger the engine pulls from
//! - **Market**: the lending market idle capital is deposited into
//! - **Ledger**: per-order deposit totals, per-order claims, state root
//! - **Engine**: validation and the all-or-nothing placement pipeline
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical placement histories give identical state roots
//! 2. **No Floating Point**: amounts are `u128` base units with checked math
//! 3. **Conservation**: each order's deposits equal the claims minted for it
//! 4. **Custody**: the engine's market balance covers every resting order

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Address, PoolKey, OrderId, Side, ticks, amounts
pub mod types;

/// Asset ledger abstraction and in-memory implementation
pub mod assets;

/// Lending market abstraction and in-memory implementation
pub mod market;

/// Order and claim ledgers, state root
pub mod ledger;

/// Order engine: placement and queries
pub mod engine;

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::EngineConfig;
pub use engine::OrderEngine;
pub use error::{EngineError, Result};
pub use types::{Address, OrderId, PlacementReceipt, PoolId, PoolKey, Side};
