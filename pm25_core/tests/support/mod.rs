#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use pm25_core::{Calibration, FilterCfg, Missing, Monitor, MonitorBuilder};
use pm25_traits::{AlertMessage, AlertNotifier, BoxError, DustSensor, ReadingStore, StatusDisplay, StoredReading};

/// Calibration under which density == voltage * 100.
pub fn linear_cal() -> Calibration {
    Calibration {
        baseline_v: 0.0,
        scale: 100.0,
    }
}

/// Unsmoothed builder: window 1, density = voltage * 100.
pub fn raw_builder() -> MonitorBuilder<Missing> {
    Monitor::builder()
        .with_calibration(linear_cal())
        .with_filter(FilterCfg { window: 1 })
}

/// Replays densities (µg/m³ under `linear_cal`); `None` is a failed read.
/// Repeats the last good value once the script runs out.
pub struct Scripted {
    seq: VecDeque<Option<f32>>,
    last: f32,
    pub reads: Rc<Cell<u32>>,
}

impl Scripted {
    pub fn densities(seq: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self {
            seq: seq.into_iter().map(|d| d.map(|d| d / 100.0)).collect(),
            last: 0.0,
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn constant(density: f32) -> Self {
        Self::densities([Some(density)])
    }
}

impl DustSensor for Scripted {
    fn read_voltage(&mut self) -> Result<f32, BoxError> {
        self.reads.set(self.reads.get() + 1);
        match self.seq.pop_front() {
            Some(Some(v)) => {
                self.last = v;
                Ok(v)
            }
            Some(None) => Err("adc nack".into()),
            None => Ok(self.last),
        }
    }
}

#[derive(Clone, Default)]
pub struct Notifier {
    pub sent: Rc<RefCell<Vec<AlertMessage>>>,
    pub attempts: Rc<Cell<u32>>,
    pub fail: Rc<Cell<bool>>,
}

impl AlertNotifier for Notifier {
    fn send_alert(&mut self, alert: &AlertMessage) -> Result<(), BoxError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail.get() {
            return Err("telegram unreachable".into());
        }
        self.sent.borrow_mut().push(alert.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct Display {
    pub frames: Rc<RefCell<Vec<(f32, String, String)>>>,
    pub fail: Rc<Cell<bool>>,
}

impl StatusDisplay for Display {
    fn render(&mut self, density: f32, level_name: &str, glyph: &str) -> Result<(), BoxError> {
        if self.fail.get() {
            return Err("i2c write failed".into());
        }
        self.frames
            .borrow_mut()
            .push((density, level_name.to_owned(), glyph.to_owned()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub density: f32,
    pub voltage: f32,
    pub level_index: u8,
    pub level_name: String,
    pub location: String,
}

#[derive(Clone, Default)]
pub struct Store {
    pub rows: Rc<RefCell<Vec<Row>>>,
    pub attempts: Rc<Cell<u32>>,
    pub fail: Rc<Cell<bool>>,
}

impl ReadingStore for Store {
    fn write_reading(&mut self, r: &StoredReading<'_>) -> Result<(), BoxError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail.get() {
            return Err("connection refused".into());
        }
        self.rows.borrow_mut().push(Row {
            density: r.density,
            voltage: r.voltage,
            level_index: r.level_index,
            level_name: r.level_name.to_owned(),
            location: r.location.to_owned(),
        });
        Ok(())
    }
}
