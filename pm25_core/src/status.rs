//! Per-tick results returned by the monitor loop.

use std::time::SystemTime;

use crate::alert::{AlertOutcome, AlertPhase};
use crate::error::MonitorError;
use crate::quality::QualityLevel;

/// One sensor sample after estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub raw_voltage: f32,
    /// Unsmoothed density in µg/m³, never negative.
    pub dust_density: f32,
    pub timestamp: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// No storage sink configured.
    Disabled,
    NotDue,
    Written,
    /// The attempt still counts for scheduling; the next one waits a full period.
    Failed(MonitorError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick counter, including skipped ticks.
    pub tick: u64,
    pub reading: Reading,
    pub smoothed: f32,
    pub level: QualityLevel,
    pub alert: AlertOutcome,
    pub alert_phase: AlertPhase,
    pub cooldown_remaining: u32,
    pub display_ok: bool,
    pub persist: PersistOutcome,
}

/// Public status of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    /// Full pipeline ran; sink failures are reported inside.
    Completed(TickReport),
    /// Sensor read failed; no display, alert or persist action occurred.
    Skipped(MonitorError),
}

impl TickStatus {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickStatus::Completed(r) => Some(r),
            TickStatus::Skipped(_) => None,
        }
    }
}
