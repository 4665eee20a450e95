//! Tick pacing helpers.

use std::time::Duration;

/// Time left in a tick of length `period` after `elapsed` of work.
/// Overruns yield zero so the next tick starts immediately, never early.
#[inline]
pub fn remaining_in_period(period: Duration, elapsed: Duration) -> Duration {
    period.saturating_sub(elapsed)
}

/// Number of whole ticks covering `span`, at least 1.
#[inline]
pub fn ticks_in(span: Duration, period: Duration) -> u64 {
    if period.is_zero() {
        return 1;
    }
    let n = span.as_nanos().div_ceil(period.as_nanos());
    u64::try_from(n).unwrap_or(u64::MAX).max(1)
}
