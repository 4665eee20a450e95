pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::time::SystemTime;

/// Error type crossing every collaborator boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Analog dust sensor: one excitation pulse, one voltage sample.
pub trait DustSensor {
    fn read_voltage(&mut self) -> Result<f32, BoxError>;
}

/// Small status screen. Failures are swallowed by the caller.
pub trait StatusDisplay {
    fn render(&mut self, density: f32, level_name: &str, glyph: &str) -> Result<(), BoxError>;
}

/// Content of one air-quality alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    /// Smoothed density in µg/m³.
    pub density: f32,
    pub level_name: &'static str,
    pub advice: &'static str,
    pub timestamp: SystemTime,
}

/// Messaging channel used for alerts. `Ok` means the message was accepted.
pub trait AlertNotifier {
    fn send_alert(&mut self, alert: &AlertMessage) -> Result<(), BoxError>;
}

/// One persisted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading<'a> {
    pub density: f32,
    pub voltage: f32,
    pub level_index: u8,
    pub level_name: &'a str,
    pub location: &'a str,
}

/// Time-series sink.
pub trait ReadingStore {
    fn write_reading(&mut self, reading: &StoredReading<'_>) -> Result<(), BoxError>;
}

impl<T: DustSensor + ?Sized> DustSensor for Box<T> {
    fn read_voltage(&mut self) -> Result<f32, BoxError> {
        (**self).read_voltage()
    }
}

impl<T: StatusDisplay + ?Sized> StatusDisplay for Box<T> {
    fn render(&mut self, density: f32, level_name: &str, glyph: &str) -> Result<(), BoxError> {
        (**self).render(density, level_name, glyph)
    }
}

impl<T: AlertNotifier + ?Sized> AlertNotifier for Box<T> {
    fn send_alert(&mut self, alert: &AlertMessage) -> Result<(), BoxError> {
        (**self).send_alert(alert)
    }
}

impl<T: ReadingStore + ?Sized> ReadingStore for Box<T> {
    fn write_reading(&mut self, reading: &StoredReading<'_>) -> Result<(), BoxError> {
        (**self).write_reading(reading)
    }
}
