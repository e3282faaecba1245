//! Pool configuration as seen by the order engine.
//!
//! The engine never touches pool state; it only needs the immutable key to
//! derive a stable [`PoolId`], to resolve the sell asset for a side, and to
//! validate target ticks against the pool's spacing.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::tick::{is_valid_tick, is_valid_tick_spacing, MAX_TICK_SPACING, MIN_TICK_SPACING};
use crate::types::{sha256, Address, OrderId, PoolId, Side};

/// Immutable pool configuration.
///
/// ## Example
///
/// ```
/// use limit_yield::types::{Address, PoolKey, Side};
///
/// let pool = PoolKey::new(
///     Address::with_last_byte(1),
///     Address::with_last_byte(2),
///     3000,
///     60,
///     Address::ZERO,
/// );
/// assert_eq!(pool.sell_token(Side::AtoB), Address::with_last_byte(1));
/// assert_eq!(pool.id(), pool.clone().id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    /// First currency, sold by `AtoB` orders
    pub currency0: Address,
    /// Second currency, sold by `BtoA` orders
    pub currency1: Address,
    /// Fee tier in hundredths of a bip
    pub fee: u32,
    pub tick_spacing: i32,
    /// Hook contract attached to the pool
    pub hooks: Address,
}

impl PoolKey {
    pub fn new(currency0: Address, currency1: Address, fee: u32, tick_spacing: i32, hooks: Address) -> Self {
        Self { currency0, currency1, fee, tick_spacing, hooks }
    }

    /// Derive the pool identity.
    ///
    /// Encoding: `currency0 || currency1 || fee (u32 BE) || tick_spacing (i32 BE) || hooks`.
    pub fn id(&self) -> PoolId {
        let mut buf = [0u8; 68];
        buf[..20].copy_from_slice(self.currency0.as_bytes());
        buf[20..40].copy_from_slice(self.currency1.as_bytes());
        buf[40..44].copy_from_slice(&self.fee.to_be_bytes());
        buf[44..48].copy_from_slice(&self.tick_spacing.to_be_bytes());
        buf[48..].copy_from_slice(self.hooks.as_bytes());
        PoolId(sha256(&buf))
    }

    /// Asset an order on `side` sells into the pool
    #[inline]
    pub fn sell_token(&self, side: Side) -> Address {
        match side {
            Side::AtoB => self.currency0,
            Side::BtoA => self.currency1,
        }
    }

    /// Order id for a target tick and side on this pool
    #[inline]
    pub fn order_id(&self, tick: i32, side: Side) -> OrderId {
        OrderId::derive(&self.id(), tick, side)
    }

    /// Reject configurations no pool could have been initialized with
    pub fn validate(&self) -> Result<(), EngineError> {
        if !is_valid_tick_spacing(self.tick_spacing) {
            return Err(EngineError::InvalidPool(format!(
                "tick spacing {} outside [{}, {}]",
                self.tick_spacing, MIN_TICK_SPACING, MAX_TICK_SPACING
            )));
        }
        if self.currency0 >= self.currency1 {
            return Err(EngineError::InvalidPool(format!(
                "currencies must be sorted and distinct: {} >= {}",
                self.currency0, self.currency1
            )));
        }
        Ok(())
    }

    /// Check a target tick against this pool's spacing and range
    pub fn validate_tick(&self, tick: i32) -> Result<(), EngineError> {
        if is_valid_tick(tick, self.tick_spacing) {
            Ok(())
        } else {
            Err(EngineError::InvalidTick { tick, tick_spacing: self.tick_spacing })
        }
    }
}
