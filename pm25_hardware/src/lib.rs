//! Hardware drivers and simulators for the dust monitor.
//!
//! The real drivers (ADS1115 over I2C, IR LED on a GPIO pin, SH1106 OLED)
//! are compiled only with the `hardware` feature on Linux.
pub mod error;
pub mod sim;
pub mod util;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod ads1115;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gp2y1010;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod sh1106;

pub use error::HwError;
pub use sim::SimulatedSensor;
pub use util::PulseTiming;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use gp2y1010::{HardwareDustSensor, SensorWiring};
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use sh1106::Sh1106Display;
