use std::time::Duration;
use tokio::time::Instant;

/// Delay before the next poll after `failures` consecutive transient
/// failures: `interval * 2^failures`, capped at `max_backoff`.
///
/// With no failures this is the plain poll interval. The cap never shortens
/// the plain interval.
pub(crate) fn backoff_delay(interval: Duration, failures: u32, max_backoff: Duration) -> Duration {
    if failures == 0 {
        return interval;
    }
    let factor = 1u32.checked_shl(failures).unwrap_or(u32::MAX);
    interval.saturating_mul(factor).min(max_backoff.max(interval))
}

/// When to wake for the next poll. Never past `deadline`.
pub(crate) fn next_wake(now: Instant, delay: Duration, deadline: Instant) -> Instant {
    now.checked_add(delay).map_or(deadline, |wake| wake.min(deadline))
}
