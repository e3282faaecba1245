//! Sell-asset collaborator.
//!
//! The engine never holds assets itself in any meaningful sense: it pulls the
//! caller's sell asset through an [`AssetLedger`] and immediately forwards it
//! to the lending market. The trait mirrors a fungible-token contract:
//! balances, allowances, `transfer` and `transfer_from`.
//!
//! ## Journaling
//!
//! `checkpoint` / `checkpoint_commit` / `checkpoint_revert` let the engine
//! undo every ledger effect of a placement that fails part-way.
//! Implementations must make `checkpoint_revert` restore the exact state
//! observed at `checkpoint`, at a cost proportional to what changed since.

pub(crate) mod journal;
mod memory;

pub use journal::JournalCheckpoint;
pub use memory::InMemoryAssetLedger;

use crate::error::AssetError;
use crate::types::Address;

/// Allowance value that is never decremented
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

/// Fungible balances for any number of assets
pub trait AssetLedger {
    /// Opaque snapshot handle
    type Checkpoint;

    fn balance_of(&self, asset: Address, account: Address) -> u128;

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> u128;

    /// Set `spender`'s allowance over `owner`'s `asset` to exactly `amount`
    fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: u128);

    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: u128) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    ///
    /// Fails with `InsufficientAuthorization` before looking at balances.
    fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), AssetError>;

    fn checkpoint(&mut self) -> Self::Checkpoint;

    /// Keep everything since the innermost open checkpoint
    fn checkpoint_commit(&mut self);

    fn checkpoint_revert(&mut self, checkpoint: Self::Checkpoint);
}
