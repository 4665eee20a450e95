use std::time::{Duration, Instant};

use pm25_traits::Clock;

use crate::error::{HwError, Result};

/// Delays around one excitation pulse of the dust sensor's IR LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    /// LED on -> sample.
    pub settle: Duration,
    /// sample -> LED off. Zero on the first board revision.
    pub hold: Duration,
    /// LED off -> return; completes the ~10 ms pulse cycle.
    pub recovery: Duration,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_micros(280),
            hold: Duration::ZERO,
            recovery: Duration::from_micros(9_720),
        }
    }
}

impl PulseTiming {
    pub fn from_micros(settle_us: u64, hold_us: u64, recovery_us: u64) -> Self {
        Self {
            settle: Duration::from_micros(settle_us),
            hold: Duration::from_micros(hold_us),
            recovery: Duration::from_micros(recovery_us),
        }
    }

    /// Full duration of one pulse cycle.
    pub fn total(&self) -> Duration {
        self.settle + self.hold + self.recovery
    }
}

/// Run one excitation pulse: assert, settle, sample, hold, de-assert, recover.
///
/// `excite(true)` turns the LED on and `excite(false)` turns it off; pin
/// polarity is the caller's concern. The LED is always switched off again,
/// even when `sample` fails, and the recovery delay is honoured on both
/// paths so the sensor's duty cycle stays fixed.
pub fn excitation_pulse<T>(
    clock: &dyn Clock,
    timing: PulseTiming,
    mut excite: impl FnMut(bool) -> Result<()>,
    sample: impl FnOnce() -> Result<T>,
) -> Result<T> {
    excite(true)?;
    clock.sleep(timing.settle);
    let value = sample();
    clock.sleep(timing.hold);
    let off = excite(false);
    clock.sleep(timing.recovery);
    let value = value?;
    off?;
    Ok(value)
}

/// Poll `ready` until it returns true or `timeout` expires.
/// Sleeps in small intervals to avoid CPU spinning.
pub fn wait_until_with_timeout(
    mut ready: impl FnMut() -> Result<bool>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while !ready()? {
        if Instant::now() >= deadline {
            return Err(HwError::ConversionTimeout);
        }
        std::thread::sleep(poll_interval);
    }
    Ok(())
}
