//! Tick bounds and alignment rules.
//!
//! Tick math itself (tick <-> sqrt price) belongs to the pool and is not
//! implemented here. The core only needs to know whether a target tick is
//! one the pool could ever cross.

/// Lowest tick a pool supports
pub const MIN_TICK: i32 = -887_272;

/// Highest tick a pool supports
pub const MAX_TICK: i32 = 887_272;

pub const MIN_TICK_SPACING: i32 = 1;

pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// Lowest tick aligned to `tick_spacing`.
///
/// Truncating division, so the result is always `>= MIN_TICK`.
#[inline]
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// Highest tick aligned to `tick_spacing`
#[inline]
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

#[inline]
pub fn is_valid_tick_spacing(tick_spacing: i32) -> bool {
    (MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing)
}

/// `true` iff `tick` is aligned to `tick_spacing` and inside the usable range.
///
/// Callers must pass a valid spacing; an invalid spacing yields `false`.
pub fn is_valid_tick(tick: i32, tick_spacing: i32) -> bool {
    if !is_valid_tick_spacing(tick_spacing) {
        return false;
    }
    tick % tick_spacing == 0
        && (min_usable_tick(tick_spacing)..=max_usable_tick(tick_spacing)).contains(&tick)
}
