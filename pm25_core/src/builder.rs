//! Type-state builder for `Monitor`.
//!
//! `build()` is only available once a sensor has been provided; `try_build()`
//! is always available and reports a missing sensor as `BuildError::MissingSensor`.

use std::marker::PhantomData;

use pm25_traits::clock::{Clock, MonotonicClock};
use pm25_traits::{AlertNotifier, DustSensor, ReadingStore, StatusDisplay};

use crate::alert::AlertState;
use crate::config::{AlertCfg, FilterCfg, StorageCfg, TimingCfg};
use crate::error::{BuildError, Result};
use crate::estimator::Calibration;
use crate::filter::SmoothingWindow;
use crate::mocks::{NoopDisplay, NoopNotifier};
use crate::monitor::Monitor;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Monitor`. Configuration is validated on `build()`.
pub struct MonitorBuilder<S> {
    sensor: Option<Box<dyn DustSensor>>,
    display: Option<Box<dyn StatusDisplay>>,
    notifier: Option<Box<dyn AlertNotifier>>,
    store: Option<Box<dyn ReadingStore>>,
    calibration: Calibration,
    filter: FilterCfg,
    alert: AlertCfg,
    timing: TimingCfg,
    storage: StorageCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
}

impl Default for MonitorBuilder<Missing> {
    fn default() -> Self {
        Self {
            sensor: None,
            display: None,
            notifier: None,
            store: None,
            calibration: Calibration::default(),
            filter: FilterCfg::default(),
            alert: AlertCfg::default(),
            timing: TimingCfg::default(),
            storage: StorageCfg::default(),
            clock: None,
            _s: PhantomData,
        }
    }
}

impl<S> MonitorBuilder<S> {
    pub fn with_sensor(self, sensor: impl DustSensor + 'static) -> MonitorBuilder<Set> {
        MonitorBuilder {
            sensor: Some(Box::new(sensor)),
            display: self.display,
            notifier: self.notifier,
            store: self.store,
            calibration: self.calibration,
            filter: self.filter,
            alert: self.alert,
            timing: self.timing,
            storage: self.storage,
            clock: self.clock,
            _s: PhantomData,
        }
    }

    /// Defaults to a display that discards frames.
    pub fn with_display(mut self, display: impl StatusDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Defaults to a notifier that accepts and drops every alert.
    pub fn with_notifier(mut self, notifier: impl AlertNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Without a store, persistence is disabled.
    pub fn with_store(mut self, store: impl ReadingStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_alert(mut self, alert: AlertCfg) -> Self {
        self.alert = alert;
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_storage(mut self, storage: StorageCfg) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    fn validate(&self) -> std::result::Result<(), BuildError> {
        if self.filter.window == 0 {
            return Err(BuildError::InvalidConfig("filter.window must be >= 1"));
        }
        if !(self.calibration.scale.is_finite() && self.calibration.scale > 0.0) {
            return Err(BuildError::InvalidConfig("calibration.scale must be > 0"));
        }
        if !self.calibration.baseline_v.is_finite() {
            return Err(BuildError::InvalidConfig("calibration.baseline_v must be finite"));
        }
        if self.timing.tick_ms == 0 {
            return Err(BuildError::InvalidConfig("timing.tick_ms must be >= 1"));
        }
        if self.storage.location.trim().is_empty() {
            return Err(BuildError::InvalidConfig("storage.location must not be empty"));
        }
        Ok(())
    }

    /// Build without the compile-time sensor guarantee.
    pub fn try_build(self) -> Result<Monitor> {
        self.validate()?;
        let sensor = self.sensor.ok_or(BuildError::MissingSensor)?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        let epoch = clock.now();
        Ok(Monitor {
            sensor,
            display: self.display.unwrap_or_else(|| Box::new(NoopDisplay)),
            notifier: self.notifier.unwrap_or_else(|| Box::new(NoopNotifier)),
            store: self.store,
            calibration: self.calibration,
            window: SmoothingWindow::new(self.filter.window),
            alert: AlertState::new(),
            alert_cfg: self.alert,
            timing: self.timing,
            storage: self.storage,
            clock,
            epoch,
            last_persist_ms: None,
            ticks: 0,
        })
    }
}

impl MonitorBuilder<Set> {
    pub fn build(self) -> Result<Monitor> {
        self.try_build()
    }
}
