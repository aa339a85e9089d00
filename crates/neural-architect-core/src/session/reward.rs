/// XP granted per focused minute at multiplier 1.0 (25 minutes earns 50).
pub const XP_PER_FOCUS_MINUTE: f64 = 2.0;

/// XP for a completed focus interval, rounded to the nearest integer.
///
/// Negative or non-finite inputs clamp to zero. Monotonically
/// non-decreasing in `duration_minutes` for a fixed multiplier.
pub fn calculate_reward(duration_minutes: f64, multiplier: f64) -> u64 {
    if !duration_minutes.is_finite() || !multiplier.is_finite() {
        return 0;
    }
    let raw = duration_minutes.max(0.0) * XP_PER_FOCUS_MINUTE * multiplier.max(0.0);
    raw.round() as u64
}
