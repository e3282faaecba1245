//! Resting order sizes keyed by (pool, target tick, side).
//!
//! ## Design
//!
//! A single `BTreeMap` keyed by the composite [`OrderKey`] replaces nested
//! pool -> tick -> side maps. The ordered map gives deterministic iteration,
//! which the state root depends on.
//!
//! Entries are created implicitly on first deposit and never removed; an
//! order may logically drain to zero once fills exist, but the key stays.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::types::{OrderId, PoolId, Side};

/// Composite key of a resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    pub pool_id: PoolId,
    pub tick: i32,
    pub side: Side,
}

impl OrderKey {
    pub fn new(pool_id: PoolId, tick: i32, side: Side) -> Self {
        Self { pool_id, tick, side }
    }

    #[inline]
    pub fn order_id(&self) -> OrderId {
        OrderId::derive(&self.pool_id, self.tick, self.side)
    }
}

/// Accounting state of one resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestingOrder {
    /// Cumulative amount deposited into this order
    pub total_deposited: u128,
    /// Number of deposits that built the order
    pub deposit_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    orders: BTreeMap<OrderKey, RestingOrder>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resting size at `key`, zero if nothing was ever deposited there
    #[inline]
    pub fn total_deposited(&self, key: &OrderKey) -> u128 {
        self.orders.get(key).map_or(0, |o| o.total_deposited)
    }

    pub fn get(&self, key: &OrderKey) -> Option<&RestingOrder> {
        self.orders.get(key)
    }

    /// What `increment` would produce, without mutating
    pub fn checked_total_after(&self, key: &OrderKey, amount: u128) -> Result<u128, EngineError> {
        self.total_deposited(key).checked_add(amount).ok_or(EngineError::Overflow)
    }

    /// Add `amount` to the order at `key`, creating it if needed.
    ///
    /// # Returns
    ///
    /// The new `total_deposited`.
    pub(crate) fn increment(&mut self, key: OrderKey, amount: u128) -> Result<u128, EngineError> {
        let new_total = self.checked_total_after(&key, amount)?;
        let order = self.orders.entry(key).or_default();
        order.total_deposited = new_total;
        order.deposit_count += 1;
        Ok(new_total)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All orders in key order
    pub fn iter(&self) -> impl Iterator<Item = (&OrderKey, &RestingOrder)> {
        self.orders.iter()
    }

    /// Orders resting on one pool, in (tick, side) order
    pub fn orders_in_pool(&self, pool_id: PoolId) -> impl Iterator<Item = (&OrderKey, &RestingOrder)> {
        let first = OrderKey::new(pool_id, i32::MIN, Side::AtoB);
        let last = OrderKey::new(pool_id, i32::MAX, Side::BtoA);
        self.orders.range(first..=last)
    }
}
