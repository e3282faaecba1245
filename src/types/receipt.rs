//! Receipt returned by a successful order placement.
//!
//! The receipt is an SSZ container so hosts can persist or forward it with
//! a deterministic encoding.

use ssz_rs::prelude::*;

use crate::types::{Address, OrderId};

/// Summary of one successful `place_order` call.
///
/// ## SSZ Layout
///
/// Fixed-size container, 32 + 20 + 16 + 16 + 16 + 8 = 108 bytes.
///
/// ## Example
///
/// ```
/// use limit_yield::types::{Address, OrderId, PlacementReceipt};
///
/// let receipt = PlacementReceipt::new(
///     OrderId([1u8; 32]),
///     Address::with_last_byte(9),
///     1_000,   // amount
///     5_000,   // order total after placement
///     5_000,   // claims minted after placement
///     3,       // sequence
/// );
/// assert_eq!(receipt.holder(), Address::with_last_byte(9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct PlacementReceipt {
    /// Claim class the holder was minted into
    pub order_id: [u8; 32],

    /// Holder the claims were minted to
    /// Stored as raw bytes for SSZ compatibility
    pub holder_raw: [u8; 20],

    /// Amount deposited and minted by this call
    pub amount: u128,

    /// Order's `total_deposited` after this call
    pub total_deposited: u128,

    /// `claims_minted` for the order after this call
    pub claims_minted: u128,

    /// Engine-wide placement sequence number (1-based)
    pub sequence: u64,
}

impl PlacementReceipt {
    pub fn new(
        order_id: OrderId,
        holder: Address,
        amount: u128,
        total_deposited: u128,
        claims_minted: u128,
        sequence: u64,
    ) -> Self {
        Self {
            order_id: order_id.0,
            holder_raw: holder.0,
            amount,
            total_deposited,
            claims_minted,
            sequence,
        }
    }

    pub fn order_id(&self) -> OrderId {
        OrderId(self.order_id)
    }

    pub fn holder(&self) -> Address {
        Address(self.holder_raw)
    }

    /// `true` if this placement created the order
    pub fn is_first_deposit(&self) -> bool {
        self.total_deposited == self.amount
    }
}
