use std::time::Duration;

/// Delay before retry number `retry` (0 = first retry): `base * 2^retry`.
///
/// ```
/// use std::time::Duration;
/// use cdx_index::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(retry: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry))
}
