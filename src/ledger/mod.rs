//! Ledgers owned by the order engine.
//!
//! ## Components
//!
//! - [`OrderLedger`]: (pool, tick, side) -> total deposited
//! - [`ClaimLedger`]: order id -> holder -> claim balance, plus per-id totals
//! - [`compute_state_root`]: SHA-256 over SSZ records of both
//!
//! Neither ledger knows about the other. Keeping
//! `total_deposited == claims_minted` for every order is the engine's job.

pub mod claims;
pub mod orders;
pub mod snapshot;

pub use claims::ClaimLedger;
pub use orders::{OrderKey, OrderLedger, RestingOrder};
pub use snapshot::{compute_state_root, ClaimRecord, OrderRecord};
