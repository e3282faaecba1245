//! Lending-market adapter contract.
//!
//! Idle order capital is parked in a yield-bearing lending market while the
//! order rests. The engine depends only on this trait; the market's interest
//! model is entirely its own business.
//!
//! ## Custody Model
//!
//! - `deposit` pulls the asset from the depositor into the market's own
//!   account ([`LendingMarket::address`]) using the market's allowance, then
//!   credits `on_behalf_of`.
//! - `withdraw` debits the owner's market balance and pays the asset out of
//!   market custody.
//! - Balances may pool many orders' funds; the engine only requires that its
//!   aggregate balance covers the orders sold in that asset.
//!
//! Every method either succeeds fully or leaves no effect. `checkpoint` /
//! `checkpoint_revert` additionally let the engine roll back a *successful*
//! deposit when a later step of the same placement fails.

mod memory;

pub use memory::InMemoryLendingMarket;

use crate::assets::AssetLedger;
use crate::error::AdapterError;
use crate::types::Address;

pub trait LendingMarket {
    /// Opaque snapshot handle
    type Checkpoint;

    /// Account that holds deposited assets on the asset ledger
    fn address(&self) -> Address;

    fn deposit<A: AssetLedger>(
        &mut self,
        assets: &mut A,
        depositor: Address,
        asset: Address,
        amount: u128,
        on_behalf_of: Address,
    ) -> Result<(), AdapterError>;

    /// Returns the amount actually paid out
    fn withdraw<A: AssetLedger>(
        &mut self,
        assets: &mut A,
        asset: Address,
        amount: u128,
        owner: Address,
        to: Address,
    ) -> Result<u128, AdapterError>;

    fn balance_of(&self, asset: Address, account: Address) -> u128;

    fn checkpoint(&mut self) -> Self::Checkpoint;

    fn checkpoint_commit(&mut self);

    fn checkpoint_revert(&mut self, checkpoint: Self::Checkpoint);
}
