//! Deterministic state root over the order and claim ledgers.
//!
//! Each resting order and each claim balance is encoded as a fixed-size SSZ
//! container, in map order, and the stream is hashed with SHA-256:
//!
//! ```text
//! root = sha256( len(orders) as u64 LE || OrderRecord* || ClaimRecord* )
//! ```
//!
//! Identical placement histories give identical roots; any change to a
//! total, a balance or a key changes the root.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::EngineError;
use crate::ledger::{ClaimLedger, OrderKey, OrderLedger, RestingOrder};

/// SSZ record of one resting order (109 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderRecord {
    pub order_id: [u8; 32],
    pub pool_id: [u8; 32],
    /// Tick as its two's-complement bit pattern
    pub tick_raw: u32,
    /// Side as u8 (0=AtoB, 1=BtoA)
    pub side_raw: u8,
    pub total_deposited: u128,
    pub claims_minted: u128,
    pub deposit_count: u64,
}

impl OrderRecord {
    pub fn new(key: &OrderKey, order: &RestingOrder, claims_minted: u128) -> Self {
        Self {
            order_id: key.order_id().0,
            pool_id: key.pool_id.0,
            tick_raw: key.tick as u32,
            side_raw: key.side.to_u8(),
            total_deposited: order.total_deposited,
            claims_minted,
            deposit_count: order.deposit_count,
        }
    }

    pub fn tick(&self) -> i32 {
        self.tick_raw as i32
    }
}

/// SSZ record of one holder's claim balance (68 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ClaimRecord {
    pub order_id: [u8; 32],
    pub holder_raw: [u8; 20],
    pub balance: u128,
}

fn encode<T: SimpleSerialize>(record: &T) -> Result<Vec<u8>, EngineError> {
    ssz_rs::serialize(record).map_err(|e| EngineError::Encoding(format!("{e:?}")))
}

/// Compute the state root of both ledgers
pub fn compute_state_root(orders: &OrderLedger, claims: &ClaimLedger) -> Result<[u8; 32], EngineError> {
    let mut hasher = Sha256::new();
    hasher.update((orders.len() as u64).to_le_bytes());

    for (key, order) in orders.iter() {
        let record = OrderRecord::new(key, order, claims.total_minted(&key.order_id()));
        hasher.update(encode(&record)?);
    }

    for (id, _) in claims.classes() {
        for (holder, balance) in claims.holders(id) {
            let record = ClaimRecord { order_id: id.0, holder_raw: holder.0, balance: *balance };
            hasher.update(encode(&record)?);
        }
    }

    Ok(hasher.finalize().into())
}
