//! Core data types for the limit-order accounting core
//!
//! ## Types
//!
//! - [`Address`]: 20-byte account / asset identifier
//! - [`PoolKey`] / [`PoolId`]: pool configuration and its hashed identity
//! - [`Side`]: which pool currency an order sells
//! - [`OrderId`]: hashed identity of a resting order and its claim class
//! - [`PlacementReceipt`]: result of a successful placement
//!
//! ## Amounts
//!
//! All amounts are `u128` base units with checked arithmetic. The
//! [`amount`] module converts to and from human-readable decimals.

mod address;
mod ids;
mod pool;
mod receipt;
mod side;
pub mod amount;
pub mod tick;

pub use address::Address;
pub use ids::{sha256, OrderId, PoolId};
pub use pool::PoolKey;
pub use receipt::PlacementReceipt;
pub use side::Side;
