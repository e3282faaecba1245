//! Error types for every layer of the accounting core.
//!
//! Each collaborator has its own error enum. The engine wraps them so the
//! caller of `place_order` can tell which step failed.

use thiserror::Error;

/// Errors from parsing identifiers and amounts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid side: {0}")]
    InvalidSide(String),
}

/// Errors raised by an [`AssetLedger`](crate::assets::AssetLedger)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Spender's allowance is below the requested amount
    #[error("insufficient authorization: allowance {allowance}, requested {requested}")]
    InsufficientAuthorization { allowance: u128, requested: u128 },

    #[error("insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: u128, requested: u128 },

    #[error("asset balance overflow")]
    Overflow,
}

/// Errors raised by a [`LendingMarket`](crate::market::LendingMarket)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("lending market is paused")]
    Paused,

    #[error("supply cap exceeded: cap {cap}, would reach {requested}")]
    SupplyCapExceeded { cap: u128, requested: u128 },

    #[error("insufficient market balance: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: u128, requested: u128 },

    #[error("asset transfer failed: {0}")]
    Transfer(#[from] AssetError),

    #[error("market balance overflow")]
    Overflow,
}

/// Errors surfaced by the [`OrderEngine`](crate::engine::OrderEngine)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Target tick is misaligned with the pool's spacing or out of range
    #[error("invalid tick {tick} for tick spacing {tick_spacing}")]
    InvalidTick { tick: i32, tick_spacing: i32 },

    #[error("invalid amount {amount}: minimum is {minimum}")]
    InvalidAmount { amount: u128, minimum: u128 },

    #[error("invalid pool: {0}")]
    InvalidPool(String),

    #[error("arithmetic overflow")]
    Overflow,

    /// Pulling the sell asset from the caller failed
    #[error("transfer failed: {0}")]
    TransferFailed(#[source] AssetError),

    #[error("lending market deposit failed: {0}")]
    AdapterDepositFailed(#[source] AdapterError),

    /// Reserved for the withdrawal path; placement never raises it
    #[error("lending market withdraw failed: {0}")]
    AdapterWithdrawFailed(#[source] AdapterError),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors from loading an [`EngineConfig`](crate::config::EngineConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
