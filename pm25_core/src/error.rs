use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// The sensor could not produce a usable sample this tick.
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),
    #[error("{sink} delivery failed: {reason}")]
    DeliveryFailed { sink: &'static str, reason: String },
    #[error("startup failed: {0}")]
    Startup(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// Flatten a trait-boundary error (with its source chain) into a sink failure.
    pub fn delivery(sink: &'static str, e: &(dyn std::error::Error + 'static)) -> Self {
        MonitorError::DeliveryFailed {
            sink,
            reason: chain_to_string(e),
        }
    }

    pub fn sensor(e: &(dyn std::error::Error + 'static)) -> Self {
        MonitorError::SensorUnavailable(chain_to_string(e))
    }
}

fn chain_to_string(e: &(dyn std::error::Error + 'static)) -> String {
    let mut s = e.to_string();
    let mut cur = e.source();
    while let Some(inner) = cur {
        s.push_str(": ");
        s.push_str(&inner.to_string());
        cur = inner.source();
    }
    s
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing sensor")]
    MissingSensor,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
