//! Engine configuration.
//!
//! Loaded from a JSON file; every field has a default so `{}` is a valid
//! config. Unknown keys are rejected rather than silently ignored.
//!
//! ```json
//! {
//!   "engine_account": "0x00000000000000000000000000000000000000ee",
//!   "min_order_amount": "1000",
//!   "log_filter": "limit_yield=debug"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::types::Address;

/// Default custody account of the engine on the asset ledger and market
pub const DEFAULT_ENGINE_ACCOUNT: Address = Address::with_last_byte(0xee);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Account the engine holds custody and market balances under
    pub engine_account: Address,

    /// Smallest accepted order amount in base units (>= 1)
    #[serde(with = "u128_string")]
    pub min_order_amount: u128,

    /// `tracing_subscriber::EnvFilter` directive used by the binary
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_account: DEFAULT_ENGINE_ACCOUNT,
            min_order_amount: 1,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_order_amount == 0 {
            return Err(ConfigError::Invalid("min_order_amount must be at least 1".to_string()));
        }
        if self.engine_account.is_zero() {
            return Err(ConfigError::Invalid("engine_account must not be the zero address".to_string()));
        }
        Ok(())
    }
}

/// JSON numbers lose precision past 2^53, so u128 amounts travel as strings.
/// Plain integers are accepted too.
mod u128_string {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Num(n) => Ok(n as u128),
        }
    }
}
