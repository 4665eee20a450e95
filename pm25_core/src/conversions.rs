//! `From` implementations bridging `pm25_config` types to `pm25_core` types.

use crate::config::{AlertCfg, FilterCfg, StorageCfg, TimingCfg};
use crate::estimator::Calibration;

impl From<&pm25_config::FilterCfg> for FilterCfg {
    fn from(c: &pm25_config::FilterCfg) -> Self {
        Self { window: c.window }
    }
}

impl From<&pm25_config::AlertCfg> for AlertCfg {
    fn from(c: &pm25_config::AlertCfg) -> Self {
        Self {
            cooldown_ticks: c.cooldown_ticks,
        }
    }
}

impl From<&pm25_config::TimingCfg> for TimingCfg {
    fn from(c: &pm25_config::TimingCfg) -> Self {
        Self {
            tick_ms: c.tick_ms,
            persist_every_ms: c.persist_every_s.saturating_mul(1_000),
        }
    }
}

impl From<&pm25_config::StorageCfg> for StorageCfg {
    fn from(c: &pm25_config::StorageCfg) -> Self {
        Self {
            location: c.location.clone(),
        }
    }
}

impl From<&pm25_config::Calibration> for Calibration {
    fn from(c: &pm25_config::Calibration) -> Self {
        Self {
            baseline_v: c.baseline_v,
            scale: c.scale,
        }
    }
}
