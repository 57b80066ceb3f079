use std::time::Duration;

/// Delay to wait before retry number `retry_count` (0 = first retry).
///
/// Doubles per retry starting at `base`; saturates instead of overflowing.
///
/// ```
/// use std::time::Duration;
/// use arcsync_fetch::core::retry_delay;
///
/// let base = Duration::from_millis(500);
/// assert_eq!(retry_delay(0, base), Duration::from_millis(500));
/// assert_eq!(retry_delay(1, base), Duration::from_secs(1));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry_count))
}
