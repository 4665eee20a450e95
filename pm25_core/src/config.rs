//! Runtime configuration consumed by the monitor loop.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCfg {
    /// Moving-average window length (samples).
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertCfg {
    /// Ticks to suppress repeat alerts after a successful send.
    pub cooldown_ticks: u32,
}

impl Default for AlertCfg {
    fn default() -> Self {
        Self {
            cooldown_ticks: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingCfg {
    pub tick_ms: u64,
    /// Minimum wall time between persisted records.
    pub persist_every_ms: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            persist_every_ms: 10_000,
        }
    }
}

impl TimingCfg {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCfg {
    /// Tag attached to every persisted record.
    pub location: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            location: "home".into(),
        }
    }
}
