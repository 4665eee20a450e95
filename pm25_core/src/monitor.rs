//! The per-tick pipeline: sample, estimate, smooth, classify, alert, render, persist.

use std::time::{Instant, SystemTime};

use pm25_traits::clock::Clock;
use pm25_traits::{AlertMessage, AlertNotifier, DustSensor, ReadingStore, StatusDisplay, StoredReading};

use crate::alert::{AlertOutcome, AlertState};
use crate::builder::{Missing, MonitorBuilder};
use crate::config::{AlertCfg, StorageCfg, TimingCfg};
use crate::error::MonitorError;
use crate::estimator::Calibration;
use crate::filter::SmoothingWindow;
use crate::quality::{QualityLevel, classify};
use crate::status::{PersistOutcome, Reading, TickReport, TickStatus};

/// Owns the sensor and every sink for the lifetime of the process.
///
/// Dropping the monitor drops the sensor and sinks, which is where hardware
/// drivers release their pins and buses.
pub struct Monitor {
    pub(crate) sensor: Box<dyn DustSensor>,
    pub(crate) display: Box<dyn StatusDisplay>,
    pub(crate) notifier: Box<dyn AlertNotifier>,
    pub(crate) store: Option<Box<dyn ReadingStore>>,
    pub(crate) calibration: Calibration,
    pub(crate) window: SmoothingWindow,
    pub(crate) alert: AlertState,
    pub(crate) alert_cfg: AlertCfg,
    pub(crate) timing: TimingCfg,
    pub(crate) storage: StorageCfg,
    pub(crate) clock: Box<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) last_persist_ms: Option<u64>,
    pub(crate) ticks: u64,
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field("ticks", &self.ticks)
            .field("calibration", &self.calibration)
            .field("window_len", &self.window.len())
            .field("alert", &self.alert)
            .field("persistence", &self.store.is_some())
            .finish()
    }
}

impl Monitor {
    pub fn builder() -> MonitorBuilder<Missing> {
        MonitorBuilder::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn alert_state(&self) -> &AlertState {
        &self.alert
    }

    pub fn timing(&self) -> &TimingCfg {
        &self.timing
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Run one tick. Never fails as a whole: a sensor fault skips the tick,
    /// sink faults are logged and reported in the returned `TickReport`.
    pub fn tick(&mut self) -> TickStatus {
        self.ticks += 1;
        let tick = self.ticks;

        let voltage = match self.sensor.read_voltage() {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                let err = MonitorError::SensorUnavailable(format!("non-finite sample {v}"));
                tracing::warn!(tick, error = %err, "sensor read failed; skipping tick");
                return TickStatus::Skipped(err);
            }
            Err(e) => {
                let err = MonitorError::sensor(&*e);
                tracing::warn!(tick, error = %err, "sensor read failed; skipping tick");
                return TickStatus::Skipped(err);
            }
        };

        let reading = Reading {
            raw_voltage: voltage,
            dust_density: self.calibration.to_density(voltage),
            timestamp: SystemTime::now(),
        };
        let smoothed = self.window.push(reading.dust_density);
        let (level, glyph) = classify(smoothed);

        let alert = self.run_alert(smoothed, level, reading.timestamp);
        let display_ok = self.render(smoothed, level, glyph);

        tracing::info!(
            tick,
            density = smoothed,
            voltage,
            level = level.name(),
            "PM2.5 {smoothed:6.1} | {voltage:.3}V | {level}"
        );

        let persist = self.persist_if_due(smoothed, voltage, level);

        TickStatus::Completed(TickReport {
            tick,
            reading,
            smoothed,
            level,
            alert,
            alert_phase: self.alert.phase(),
            cooldown_remaining: self.alert.cooldown_remaining(),
            display_ok,
            persist,
        })
    }

    fn run_alert(&mut self, smoothed: f32, level: QualityLevel, at: SystemTime) -> AlertOutcome {
        let notifier = &mut self.notifier;
        let outcome = self
            .alert
            .step(level, self.alert_cfg.cooldown_ticks, || {
                let msg = AlertMessage {
                    density: smoothed,
                    level_name: level.name(),
                    advice: level.advice(),
                    timestamp: at,
                };
                notifier
                    .send_alert(&msg)
                    .map_err(|e| MonitorError::delivery("messaging", &*e))
            });

        match &outcome {
            AlertOutcome::Sent => tracing::info!(
                level = level.name(),
                density = smoothed,
                cooldown_ticks = self.alert_cfg.cooldown_ticks,
                "alert sent"
            ),
            AlertOutcome::DeliveryFailed(e) => {
                tracing::warn!(error = %e, "alert delivery failed; will retry next tick")
            }
            AlertOutcome::Cleared => tracing::info!(level = level.name(), "air quality recovered; alert re-armed"),
            _ => {}
        }
        outcome
    }

    fn render(&mut self, smoothed: f32, level: QualityLevel, glyph: &str) -> bool {
        match self.display.render(smoothed, level.name(), glyph) {
            Ok(()) => true,
            Err(e) => {
                let err = MonitorError::delivery("display", &*e);
                tracing::warn!(error = %err, "display update failed");
                false
            }
        }
    }

    fn persist_if_due(&mut self, smoothed: f32, voltage: f32, level: QualityLevel) -> PersistOutcome {
        let Some(store) = self.store.as_mut() else {
            return PersistOutcome::Disabled;
        };
        let now_ms = self.clock.ms_since(self.epoch);
        let due = match self.last_persist_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.timing.persist_every_ms,
        };
        if !due {
            return PersistOutcome::NotDue;
        }
        self.last_persist_ms = Some(now_ms);

        let record = StoredReading {
            density: smoothed,
            voltage,
            level_index: level.index(),
            level_name: level.name(),
            location: &self.storage.location,
        };
        match store.write_reading(&record) {
            Ok(()) => {
                tracing::debug!(density = smoothed, "reading persisted");
                PersistOutcome::Written
            }
            Err(e) => {
                let err = MonitorError::delivery("storage", &*e);
                tracing::warn!(error = %err, "persisting reading failed");
                PersistOutcome::Failed(err)
            }
        }
    }

    /// Release the sensor and sinks, logging how long the monitor ran.
    pub fn shutdown(self) {
        tracing::info!(ticks = self.ticks, "monitor stopped; releasing sensor and sinks");
        drop(self);
    }
}
