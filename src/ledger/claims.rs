//! Per-order claim tokens.
//!
//! Every [`OrderId`] is its own fungible claim class. A holder's balance in
//! a class is their share of that order's deposits; the per-class
//! `total_minted` is what proportional redemption will divide by.
//!
//! ## Invariant
//!
//! For every class, the sum of holder balances equals `total_minted`.
//! `mint` and `burn` keep it by updating both sides or neither.
//!
//! The engine owns its `ClaimLedger` and only hands out `&ClaimLedger`, so
//! callers can read balances but never mint.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::types::{Address, OrderId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClaimClass {
    total_minted: u128,
    balances: BTreeMap<Address, u128>,
}

#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    classes: BTreeMap<OrderId, ClaimClass>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims ever minted (net of burns) for `id`
    #[inline]
    pub fn total_minted(&self, id: &OrderId) -> u128 {
        self.classes.get(id).map_or(0, |c| c.total_minted)
    }

    #[inline]
    pub fn balance_of(&self, holder: Address, id: &OrderId) -> u128 {
        self.classes
            .get(id)
            .and_then(|c| c.balances.get(&holder))
            .copied()
            .unwrap_or(0)
    }

    /// Check that minting `amount` to `holder` cannot overflow
    pub fn check_mint(&self, id: &OrderId, holder: Address, amount: u128) -> Result<(), EngineError> {
        self.total_minted(id).checked_add(amount).ok_or(EngineError::Overflow)?;
        self.balance_of(holder, id).checked_add(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    /// Mint `amount` claims of class `id` to `holder`.
    ///
    /// # Returns
    ///
    /// The class's new `total_minted`.
    pub(crate) fn mint(&mut self, id: OrderId, holder: Address, amount: u128) -> Result<u128, EngineError> {
        self.check_mint(&id, holder, amount)?;
        if amount == 0 {
            return Ok(self.total_minted(&id));
        }
        let class = self.classes.entry(id).or_default();
        class.total_minted += amount;
        *class.balances.entry(holder).or_insert(0) += amount;
        Ok(class.total_minted)
    }

    /// Burn `amount` claims of class `id` from `holder`.
    ///
    /// Building block for redemption; fails with `InvariantViolation` rather
    /// than underflowing if the holder does not have enough.
    #[allow(dead_code)]
    pub(crate) fn burn(&mut self, id: OrderId, holder: Address, amount: u128) -> Result<u128, EngineError> {
        let balance = self.balance_of(holder, &id);
        if balance < amount {
            return Err(EngineError::InvariantViolation(format!(
                "burn of {amount} exceeds balance {balance} of {holder} in {id}"
            )));
        }
        if amount == 0 {
            return Ok(self.total_minted(&id));
        }

        let class = self
            .classes
            .get_mut(&id)
            .ok_or_else(|| EngineError::InvariantViolation(format!("unknown claim class {id}")))?;
        class.total_minted -= amount;
        let remaining = balance - amount;
        if remaining == 0 {
            class.balances.remove(&holder);
        } else {
            class.balances.insert(holder, remaining);
        }
        Ok(class.total_minted)
    }

    /// Holders of `id` with non-zero balances, in address order
    pub fn holders(&self, id: &OrderId) -> impl Iterator<Item = (&Address, &u128)> {
        self.classes.get(id).into_iter().flat_map(|c| c.balances.iter())
    }

    /// Sum of all holder balances in `id`; equals `total_minted` while the
    /// ledger is consistent
    pub fn sum_of_balances(&self, id: &OrderId) -> Option<u128> {
        self.holders(id).try_fold(0u128, |acc, (_, b)| acc.checked_add(*b))
    }

    /// Every class with its total, in id order
    pub fn classes(&self) -> impl Iterator<Item = (&OrderId, u128)> {
        self.classes.iter().map(|(id, c)| (id, c.total_minted))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
