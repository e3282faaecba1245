//! In-memory [`AssetLedger`] for tests, benches and the CLI.

use std::collections::HashMap;

use crate::assets::journal::{Journal, JournalCheckpoint};
use crate::assets::{AssetLedger, UNLIMITED_ALLOWANCE};
use crate::error::AssetError;
use crate::types::Address;

/// Previous value of one slot, `None` if the slot was absent
#[derive(Debug, Clone)]
enum Change {
    Balance((Address, Address), Option<u128>),
    Allowance((Address, Address, Address), Option<u128>),
    Supply(Address, Option<u128>),
}

/// Balances keyed by `(asset, account)`, allowances by `(asset, owner, spender)`.
///
/// ## Example
///
/// ```
/// use limit_yield::assets::{AssetLedger, InMemoryAssetLedger};
/// use limit_yield::types::Address;
///
/// let token = Address::with_last_byte(1);
/// let alice = Address::with_last_byte(10);
/// let bob = Address::with_last_byte(11);
///
/// let mut ledger = InMemoryAssetLedger::new();
/// ledger.mint(token, alice, 100).unwrap();
/// ledger.transfer(token, alice, bob, 40).unwrap();
/// assert_eq!(ledger.balance_of(token, bob), 40);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetLedger {
    balances: HashMap<(Address, Address), u128>,
    allowances: HashMap<(Address, Address, Address), u128>,
    supply: HashMap<Address, u128>,
    journal: Journal<Change>,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `to` with freshly created units of `asset`
    pub fn mint(&mut self, asset: Address, to: Address, amount: u128) -> Result<(), AssetError> {
        let supply = self.total_supply(asset).checked_add(amount).ok_or(AssetError::Overflow)?;
        let balance = self.balance_of(asset, to).checked_add(amount).ok_or(AssetError::Overflow)?;
        let prev = self.supply.insert(asset, supply);
        self.journal.record(Change::Supply(asset, prev));
        self.set_balance(asset, to, balance);
        Ok(())
    }

    pub fn total_supply(&self, asset: Address) -> u128 {
        self.supply.get(&asset).copied().unwrap_or(0)
    }

    /// Journal entries held for open checkpoints; zero between placements
    pub fn pending_changes(&self) -> usize {
        self.journal.len()
    }

    fn set_balance(&mut self, asset: Address, account: Address, value: u128) {
        let prev = self.balances.insert((asset, account), value);
        self.journal.record(Change::Balance((asset, account), prev));
    }

    fn set_allowance(&mut self, asset: Address, owner: Address, spender: Address, value: u128) {
        let prev = self.allowances.insert((asset, owner, spender), value);
        self.journal.record(Change::Allowance((asset, owner, spender), prev));
    }

    fn debit(&mut self, asset: Address, from: Address, amount: u128) -> Result<(), AssetError> {
        let balance = self.balance_of(asset, from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(AssetError::InsufficientBalance { balance, requested: amount })?;
        self.set_balance(asset, from, remaining);
        Ok(())
    }

    fn undo(&mut self, change: Change) {
        fn restore<K: std::hash::Hash + Eq>(map: &mut HashMap<K, u128>, key: K, prev: Option<u128>) {
            match prev {
                Some(value) => map.insert(key, value),
                None => map.remove(&key),
            };
        }
        match change {
            Change::Balance(key, prev) => restore(&mut self.balances, key, prev),
            Change::Allowance(key, prev) => restore(&mut self.allowances, key, prev),
            Change::Supply(asset, prev) => restore(&mut self.supply, asset, prev),
        }
    }
}

impl AssetLedger for InMemoryAssetLedger {
    type Checkpoint = JournalCheckpoint;

    fn balance_of(&self, asset: Address, account: Address) -> u128 {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(asset, owner, spender)).copied().unwrap_or(0)
    }

    fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: u128) {
        self.set_allowance(asset, owner, spender, amount);
    }

    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: u128) -> Result<(), AssetError> {
        if from == to {
            // still enforce the balance check
            let balance = self.balance_of(asset, from);
            if balance < amount {
                return Err(AssetError::InsufficientBalance { balance, requested: amount });
            }
            return Ok(());
        }

        let to_balance = self.balance_of(asset, to).checked_add(amount).ok_or(AssetError::Overflow)?;
        self.debit(asset, from, amount)?;
        self.set_balance(asset, to, to_balance);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let allowed = self.allowance(asset, from, spender);
        if amount > allowed {
            return Err(AssetError::InsufficientAuthorization { allowance: allowed, requested: amount });
        }

        self.transfer(asset, from, to, amount)?;

        if allowed != UNLIMITED_ALLOWANCE {
            self.set_allowance(asset, from, spender, allowed - amount);
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> Self::Checkpoint {
        self.journal.checkpoint()
    }

    fn checkpoint_commit(&mut self) {
        self.journal.commit();
    }

    fn checkpoint_revert(&mut self, checkpoint: Self::Checkpoint) {
        for change in self.journal.revert(checkpoint) {
            self.undo(change);
        }
    }
}
