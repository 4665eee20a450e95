//! Simulated dust sensor for development machines and CLI tests.

use std::cell::Cell;
use std::rc::Rc;

use pm25_traits::{BoxError, Clock, DustSensor, MonotonicClock};

use crate::error::HwError;
use crate::util::{PulseTiming, excitation_pulse};

/// Voltage just above the default 0.4 V baseline (clean indoor air).
pub const DEFAULT_SIM_VOLTAGE: f32 = 0.43;

/// Scripted sensor: cycles through `voltages`, optionally failing every Nth read.
///
/// The LED state is tracked so a sample taken outside the excitation window
/// is reported as a fault, the same way a real front end would return junk.
pub struct SimulatedSensor {
    voltages: Vec<f32>,
    idx: usize,
    fail_every: Option<u32>,
    reads: u32,
    led_on: Rc<Cell<bool>>,
    timing: PulseTiming,
    clock: Box<dyn Clock>,
}

impl SimulatedSensor {
    pub fn new(voltages: impl Into<Vec<f32>>) -> Self {
        let mut voltages = voltages.into();
        if voltages.is_empty() {
            voltages.push(DEFAULT_SIM_VOLTAGE);
        }
        Self {
            voltages,
            idx: 0,
            fail_every: None,
            reads: 0,
            led_on: Rc::new(Cell::new(false)),
            timing: PulseTiming::default(),
            clock: Box::new(MonotonicClock::new()),
        }
    }

    /// Build from `PM25_SIM_VOLTAGE` (comma-separated volts, cycled) and
    /// `PM25_SIM_FAIL_EVERY` (fail every Nth read).
    pub fn from_env() -> Self {
        let voltages: Vec<f32> = std::env::var("PM25_SIM_VOLTAGE")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|v| v.trim().parse::<f32>().ok())
                    .collect()
            })
            .unwrap_or_default();
        let fail_every = std::env::var("PM25_SIM_FAIL_EVERY")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0);
        let mut sim = Self::new(voltages);
        sim.fail_every = fail_every;
        sim
    }

    pub fn with_fail_every(mut self, n: u32) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    pub fn with_timing(mut self, timing: PulseTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn next_voltage(&mut self) -> f32 {
        let v = self.voltages[self.idx % self.voltages.len()];
        self.idx = self.idx.wrapping_add(1);
        v
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(vec![DEFAULT_SIM_VOLTAGE])
    }
}

impl DustSensor for SimulatedSensor {
    fn read_voltage(&mut self) -> Result<f32, BoxError> {
        self.reads = self.reads.wrapping_add(1);
        if let Some(n) = self.fail_every
            && self.reads % n == 0
        {
            return Err(Box::new(HwError::Unavailable(
                "simulated analog front end offline".into(),
            )));
        }
        let v = self.next_voltage();
        let led = self.led_on.clone();
        let sampled = led.clone();
        let out = excitation_pulse(
            self.clock.as_ref(),
            self.timing,
            move |on| {
                led.set(on);
                Ok(())
            },
            move || {
                if sampled.get() {
                    Ok(v)
                } else {
                    Err(HwError::Unavailable("sampled with led off".into()))
                }
            },
        )?;
        tracing::trace!(volts = out, "simulated dust sample");
        Ok(out)
    }
}
