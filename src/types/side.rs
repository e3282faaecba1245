//! Which asset of the pool an order sells.

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Order side.
///
/// Represented as u8 for hashing and SSZ records:
/// - AtoB = 0 (sells the pool's first currency, `zero_for_one == true`)
/// - BtoA = 1 (sells the pool's second currency)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Side {
    #[default]
    AtoB,
    BtoA,
}

impl Side {
    /// Convert from the pool-style `zero_for_one` flag
    #[inline]
    pub fn from_zero_for_one(zero_for_one: bool) -> Self {
        if zero_for_one {
            Side::AtoB
        } else {
            Side::BtoA
        }
    }

    #[inline]
    pub fn is_zero_for_one(self) -> bool {
        self == Side::AtoB
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Side::AtoB => 0,
            Side::BtoA => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::AtoB),
            1 => Some(Side::BtoA),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::AtoB => f.write_str("a-to-b"),
            Side::BtoA => f.write_str("b-to-a"),
        }
    }
}

impl FromStr for Side {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-to-b" | "atob" | "zero-for-one" => Ok(Side::AtoB),
            "b-to-a" | "btoa" | "one-for-zero" => Ok(Side::BtoA),
            other => Err(TypeError::InvalidSide(other.to_string())),
        }
    }
}
