#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core monitoring logic (hardware-agnostic).
//!
//! Every hardware and network interaction goes through the traits in
//! `pm25_traits`; this crate owns the per-tick pipeline and its state.
//!
//! ## Architecture
//!
//! - **Estimation**: linear voltage to µg/m³ conversion (`estimator`)
//! - **Smoothing**: bounded moving average (`filter`)
//! - **Classification**: AQI breakpoints to `QualityLevel` (`quality`)
//! - **Alerting**: cooldown state machine (`alert`)
//! - **Orchestration**: one tick at a time (`monitor`), paced by `runner`

pub mod alert;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod mocks;
pub mod monitor;
pub mod quality;
pub mod runner;
pub mod status;
pub mod util;

pub use alert::{AlertOutcome, AlertPhase, AlertState};
pub use builder::{Missing, MonitorBuilder, Set};
pub use config::{AlertCfg, FilterCfg, StorageCfg, TimingCfg};
pub use error::{BuildError, MonitorError};
pub use estimator::{Calibration, estimate};
pub use filter::SmoothingWindow;
pub use monitor::Monitor;
pub use quality::{QualityLevel, classify};
pub use runner::{RunParams, RunSummary, run};
pub use status::{PersistOutcome, Reading, TickReport, TickStatus};
