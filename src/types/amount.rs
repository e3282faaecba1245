//! Decimal <-> base-unit amount conversion.
//!
//! Ledger amounts are raw `u128` base units (e.g. wei for an 18-decimal
//! asset). These helpers only exist at the edges: the CLI parses human
//! amounts with them and log lines print them.
//!
//! ## Examples
//!
//! ```
//! use limit_yield::types::amount::{format_units, to_base_units};
//!
//! assert_eq!(to_base_units("1.5", 18), Some(1_500_000_000_000_000_000));
//! assert_eq!(format_units(1_500_000_000_000_000_000, 18).as_deref(), Some("1.5"));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Decimals of the assets used in examples and the CLI default
pub const DEFAULT_DECIMALS: u32 = 18;

/// Parse a decimal string into base units.
///
/// # Returns
///
/// * `Some(u128)` - the exact base-unit amount
/// * `None` - if the string is malformed, negative, has more fractional
///   digits than `decimals`, or overflows `u128`
pub fn to_base_units(s: &str, decimals: u32) -> Option<u128> {
    let d = Decimal::from_str(s.trim()).ok()?.normalize();
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }
    let scale = d.scale();
    if scale > decimals {
        return None;
    }
    let mantissa = d.mantissa().unsigned_abs();
    let factor = 10u128.checked_pow(decimals - scale)?;
    mantissa.checked_mul(factor)
}

/// Render base units as a trimmed decimal string ("1.5", "1", "0.000001").
///
/// Returns `None` when the value is too large for `Decimal` (above ~7.9e28
/// base units) or `decimals` exceeds 28.
pub fn format_units(value: u128, decimals: u32) -> Option<String> {
    let raw = i128::try_from(value).ok()?;
    let d = Decimal::try_from_i128_with_scale(raw, decimals).ok()?;
    Some(d.normalize().to_string())
}

/// Like [`format_units`], but falls back to the raw integer for log output
pub fn display_units(value: u128, decimals: u32) -> String {
    format_units(value, decimals).unwrap_or_else(|| value.to_string())
}
