use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::alert::AlertOutcome;
use crate::monitor::Monitor;
use crate::quality::QualityLevel;
use crate::status::{PersistOutcome, TickStatus};
use crate::util::{remaining_in_period, ticks_in};

/// Loop limits. `max_ticks = None` runs until shutdown is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub max_ticks: Option<u64>,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub skipped: u64,
    pub alerts_sent: u64,
    pub delivery_failures: u64,
    pub persisted: u64,
    pub last_level: Option<QualityLevel>,
    pub last_density: Option<f32>,
    pub interrupted: bool,
}

impl RunSummary {
    fn record(&mut self, status: &TickStatus) {
        self.ticks += 1;
        match status {
            TickStatus::Skipped(_) => self.skipped += 1,
            TickStatus::Completed(r) => {
                match r.alert {
                    AlertOutcome::Sent => self.alerts_sent += 1,
                    AlertOutcome::DeliveryFailed(_) => self.delivery_failures += 1,
                    _ => {}
                }
                if matches!(r.persist, PersistOutcome::Written) {
                    self.persisted += 1;
                }
                self.last_level = Some(r.level);
                self.last_density = Some(r.smoothed);
            }
        }
    }
}

/// Drive `monitor` at its configured tick period until `shutdown` is set or
/// `max_ticks` is reached, then release it.
///
/// Ticks never overlap: each tick's work finishes before the remainder of the
/// period is slept. The shutdown flag is checked between ticks. `on_tick` sees
/// every status, including skipped ticks.
pub fn run<F>(
    mut monitor: Monitor,
    params: RunParams,
    shutdown: &AtomicBool,
    mut on_tick: F,
) -> RunSummary
where
    F: FnMut(&TickStatus),
{
    let period = monitor.timing().tick();
    let persist_every = Duration::from_millis(monitor.timing().persist_every_ms);
    tracing::info!(
        tick_ms = monitor.timing().tick_ms,
        persist_every_ticks = ticks_in(persist_every, period),
        max_ticks = ?params.max_ticks,
        "monitor loop starting"
    );

    let limit_reached = |s: &RunSummary| params.max_ticks.is_some_and(|max| s.ticks >= max);
    let mut summary = RunSummary::default();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            summary.interrupted = true;
            break;
        }
        if limit_reached(&summary) {
            break;
        }

        let started = monitor.clock().now();
        let status = monitor.tick();
        summary.record(&status);
        on_tick(&status);

        // no trailing sleep after the last allowed tick
        if limit_reached(&summary) {
            break;
        }

        let elapsed = monitor.clock().now().saturating_duration_since(started);
        if elapsed > period {
            tracing::debug!(?elapsed, ?period, "tick overran its period");
        }
        monitor.clock().sleep(remaining_in_period(period, elapsed));
    }

    tracing::info!(
        ticks = summary.ticks,
        skipped = summary.skipped,
        alerts_sent = summary.alerts_sent,
        "monitor loop finished"
    );
    monitor.shutdown();
    summary
}
