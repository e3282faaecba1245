//! Hash-derived identifiers.
//!
//! Both ids are SHA-256 digests over a packed, fixed-width encoding of their
//! inputs. Anyone holding the inputs can recompute them; there is no registry
//! and nothing is ever assigned from a counter.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::Side;

/// SHA-256 of `data` as a fixed array
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

macro_rules! hash_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            #[inline]
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }
    };
}

hash_id!(
    /// Identity of a pool, derived from its immutable configuration
    PoolId
);

hash_id!(
    /// Identity of a resting order and of its claim-token class
    OrderId
);

impl OrderId {
    /// Derive the id for `(pool_id, tick, side)`.
    ///
    /// Encoding: `pool_id (32) || tick (i32 big-endian) || side (u8)`.
    pub fn derive(pool_id: &PoolId, tick: i32, side: Side) -> Self {
        let mut buf = [0u8; 37];
        buf[..32].copy_from_slice(pool_id.as_bytes());
        buf[32..36].copy_from_slice(&tick.to_be_bytes());
        buf[36] = side.to_u8();
        OrderId(sha256(&buf))
    }
}
