use std::time::Duration;

/// Slowest selectable base speed
pub const MIN_DIFFICULTY: u16 = 1;
/// Fastest selectable base speed
pub const MAX_DIFFICULTY: u16 = 25;

/// Shortest allowed base tick period, in milliseconds
const INTERVAL_FLOOR_MS: f64 = 30.0;
/// Smallest multiplier the divider will use
const MULTIPLIER_FLOOR: f64 = 0.2;

/// Time between ticks for a base speed and the active multiplier
///
/// The base period is `200 - 8 * speed` milliseconds, floored at 30; the
/// multiplier divides it, clamped below at 0.2.
pub fn tick_interval(base_speed: u16, multiplier: f64) -> Duration {
    let speed = base_speed.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    let base_ms = (200.0 - 8.0 * f64::from(speed)).max(INTERVAL_FLOOR_MS);
    let ms = base_ms / multiplier.max(MULTIPLIER_FLOOR);
    Duration::from_millis(ms.round() as u64)
}
