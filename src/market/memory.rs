//! In-memory [`LendingMarket`] used by tests, benches and the CLI.
//!
//! No interest model: balances only change through deposits, withdrawals and
//! explicit [`InMemoryLendingMarket::accrue_yield`] calls.

use std::collections::HashMap;

use tracing::debug;

use crate::assets::journal::{Journal, JournalCheckpoint};
use crate::assets::{AssetLedger, InMemoryAssetLedger};
use crate::error::AdapterError;
use crate::market::LendingMarket;
use crate::types::Address;

#[derive(Debug, Clone)]
enum Change {
    Balance((Address, Address), Option<u128>),
    Supplied(Address, Option<u128>),
}

#[derive(Debug, Clone)]
pub struct InMemoryLendingMarket {
    address: Address,
    /// Key: (asset, account)
    balances: HashMap<(Address, Address), u128>,
    /// Sum of all account balances per asset
    total_supplied: HashMap<Address, u128>,
    supply_caps: HashMap<Address, u128>,
    paused: bool,
    journal: Journal<Change>,
}

impl InMemoryLendingMarket {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: HashMap::new(),
            total_supplied: HashMap::new(),
            supply_caps: HashMap::new(),
            paused: false,
            journal: Journal::default(),
        }
    }

    /// While paused every deposit fails with [`AdapterError::Paused`]
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn set_supply_cap(&mut self, asset: Address, cap: u128) {
        self.supply_caps.insert(asset, cap);
    }

    pub fn total_supplied(&self, asset: Address) -> u128 {
        self.total_supplied.get(&asset).copied().unwrap_or(0)
    }

    /// Journal entries held for open checkpoints; zero between placements
    pub fn pending_changes(&self) -> usize {
        self.journal.len()
    }

    fn set_balance(&mut self, asset: Address, account: Address, value: u128) {
        let prev = self.balances.insert((asset, account), value);
        self.journal.record(Change::Balance((asset, account), prev));
    }

    fn set_total_supplied(&mut self, asset: Address, value: u128) {
        let prev = self.total_supplied.insert(asset, value);
        self.journal.record(Change::Supplied(asset, prev));
    }

    /// Simulate interest: mint `amount` of `asset` into market custody and
    /// credit it to `account`.
    pub fn accrue_yield(
        &mut self,
        assets: &mut InMemoryAssetLedger,
        asset: Address,
        account: Address,
        amount: u128,
    ) -> Result<(), AdapterError> {
        let balance = self.balance_of(asset, account).checked_add(amount).ok_or(AdapterError::Overflow)?;
        let total = self.total_supplied(asset).checked_add(amount).ok_or(AdapterError::Overflow)?;
        assets.mint(asset, self.address, amount)?;
        self.set_balance(asset, account, balance);
        self.set_total_supplied(asset, total);
        debug!(%asset, %account, amount, "accrued yield");
        Ok(())
    }
}

impl LendingMarket for InMemoryLendingMarket {
    type Checkpoint = JournalCheckpoint;

    fn address(&self) -> Address {
        self.address
    }

    fn deposit<A: AssetLedger>(
        &mut self,
        assets: &mut A,
        depositor: Address,
        asset: Address,
        amount: u128,
        on_behalf_of: Address,
    ) -> Result<(), AdapterError> {
        if self.paused {
            return Err(AdapterError::Paused);
        }

        let total = self.total_supplied(asset).checked_add(amount).ok_or(AdapterError::Overflow)?;
        if let Some(&cap) = self.supply_caps.get(&asset) {
            if total > cap {
                return Err(AdapterError::SupplyCapExceeded { cap, requested: total });
            }
        }
        let balance = self.balance_of(asset, on_behalf_of).checked_add(amount).ok_or(AdapterError::Overflow)?;

        assets.transfer_from(asset, self.address, depositor, self.address, amount)?;

        self.set_balance(asset, on_behalf_of, balance);
        self.set_total_supplied(asset, total);
        debug!(%asset, %depositor, %on_behalf_of, amount, "market deposit");
        Ok(())
    }

    fn withdraw<A: AssetLedger>(
        &mut self,
        assets: &mut A,
        asset: Address,
        amount: u128,
        owner: Address,
        to: Address,
    ) -> Result<u128, AdapterError> {
        let balance = self.balance_of(asset, owner);
        if amount > balance {
            return Err(AdapterError::InsufficientBalance { balance, requested: amount });
        }

        let total = self
            .total_supplied(asset)
            .checked_sub(amount)
            .ok_or(AdapterError::Overflow)?;
        assets.transfer(asset, self.address, to, amount)?;

        self.set_balance(asset, owner, balance - amount);
        self.set_total_supplied(asset, total);
        debug!(%asset, %owner, %to, amount, "market withdraw");
        Ok(amount)
    }

    fn balance_of(&self, asset: Address, account: Address) -> u128 {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    fn checkpoint(&mut self) -> Self::Checkpoint {
        self.journal.checkpoint()
    }

    fn checkpoint_commit(&mut self) {
        self.journal.commit();
    }

    fn checkpoint_revert(&mut self, checkpoint: Self::Checkpoint) {
        for change in self.journal.revert(checkpoint) {
            match change {
                Change::Balance(key, Some(value)) => {
                    self.balances.insert(key, value);
                }
                Change::Balance(key, None) => {
                    self.balances.remove(&key);
                }
                Change::Supplied(asset, Some(value)) => {
                    self.total_supplied.insert(asset, value);
                }
                Change::Supplied(asset, None) => {
                    self.total_supplied.remove(&asset);
                }
            }
        }
    }
}
