//! Alert cooldown state machine.
//!
//! ```text
//! IDLE --(level >= UNHEALTHY, delivery ok)--> ARMED_COOLING(cooldown)
//! ARMED_COOLING --(tick)--> ARMED_COOLING(n-1) | ARMED_WAITING (at 0)
//! ARMED_* --(level < UNHEALTHY)--> IDLE
//! ```
//!
//! A failed delivery leaves the machine in IDLE so the next unhealthy tick
//! retries. Dropping below UNHEALTHY clears any remaining cooldown.

use crate::error::MonitorError;
use crate::quality::QualityLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    Idle,
    ArmedCooling,
    ArmedWaiting,
}

/// What happened to alerting on one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Below threshold and nothing to clear.
    Quiet,
    /// Alert accepted by the notifier; cooldown started.
    Sent,
    /// Notifier rejected the alert; still idle, retried next unhealthy tick.
    DeliveryFailed(MonitorError),
    /// Suppressed by cooldown; `remaining` ticks left after this one.
    Cooling { remaining: u32 },
    /// Cooldown expired but the level never dropped; no re-alert until it does.
    Waiting,
    /// Level dropped below threshold; machine re-armed for the next episode.
    Cleared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    armed: bool,
    cooldown_remaining: u32,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn phase(&self) -> AlertPhase {
        match (self.armed, self.cooldown_remaining) {
            (false, _) => AlertPhase::Idle,
            (true, 0) => AlertPhase::ArmedWaiting,
            (true, _) => AlertPhase::ArmedCooling,
        }
    }

    /// Advance one tick. `deliver` is invoked at most once, and only when
    /// idle at an alerting level.
    pub fn step<F>(&mut self, level: QualityLevel, cooldown_ticks: u32, deliver: F) -> AlertOutcome
    where
        F: FnOnce() -> Result<(), MonitorError>,
    {
        if !level.is_alerting() {
            let was_armed = self.armed;
            self.armed = false;
            self.cooldown_remaining = 0;
            return if was_armed {
                AlertOutcome::Cleared
            } else {
                AlertOutcome::Quiet
            };
        }

        if !self.armed {
            return match deliver() {
                Ok(()) => {
                    self.armed = true;
                    self.cooldown_remaining = cooldown_ticks;
                    AlertOutcome::Sent
                }
                Err(e) => AlertOutcome::DeliveryFailed(e),
            };
        }

        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            if self.cooldown_remaining > 0 {
                return AlertOutcome::Cooling {
                    remaining: self.cooldown_remaining,
                };
            }
        }
        AlertOutcome::Waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ok() -> Result<(), MonitorError> {
        Ok(())
    }

    #[test]
    fn idle_below_threshold_never_delivers() {
        let mut s = AlertState::new();
        let called = Cell::new(false);
        let out = s.step(QualityLevel::Moderate, 5, || {
            called.set(true);
            Ok(())
        });
        assert_eq!(out, AlertOutcome::Quiet);
        assert!(!called.get());
        assert_eq!(s.phase(), AlertPhase::Idle);
    }

    #[test]
    fn sends_once_then_cools_down() {
        let mut s = AlertState::new();
        assert_eq!(s.step(QualityLevel::Unhealthy, 3, ok), AlertOutcome::Sent);
        assert_eq!(s.phase(), AlertPhase::ArmedCooling);
        assert_eq!(
            s.step(QualityLevel::Unhealthy, 3, || panic!("suppressed")),
            AlertOutcome::Cooling { remaining: 2 }
        );
        assert_eq!(
            s.step(QualityLevel::Hazardous, 3, || panic!("suppressed")),
            AlertOutcome::Cooling { remaining: 1 }
        );
        assert_eq!(
            s.step(QualityLevel::Unhealthy, 3, || panic!("suppressed")),
            AlertOutcome::Waiting
        );
        assert_eq!(s.phase(), AlertPhase::ArmedWaiting);
        assert_eq!(
            s.step(QualityLevel::Unhealthy, 3, || panic!("suppressed")),
            AlertOutcome::Waiting
        );
    }

    #[test]
    fn failed_delivery_stays_idle() {
        let mut s = AlertState::new();
        let out = s.step(QualityLevel::VeryBad, 3, || {
            Err(MonitorError::DeliveryFailed {
                sink: "messaging",
                reason: "offline".into(),
            })
        });
        assert!(matches!(out, AlertOutcome::DeliveryFailed(_)));
        assert_eq!(s.phase(), AlertPhase::Idle);
        assert_eq!(s.step(QualityLevel::VeryBad, 3, ok), AlertOutcome::Sent);
    }

    #[test]
    fn drop_below_threshold_clears_cooldown() {
        let mut s = AlertState::new();
        s.step(QualityLevel::Unhealthy, 300, ok);
        assert_eq!(s.step(QualityLevel::Good, 300, ok), AlertOutcome::Cleared);
        assert_eq!(s.cooldown_remaining(), 0);
        assert_eq!(s.step(QualityLevel::Unhealthy, 300, ok), AlertOutcome::Sent);
    }

    #[test]
    fn zero_cooldown_goes_straight_to_waiting() {
        let mut s = AlertState::new();
        s.step(QualityLevel::Unhealthy, 0, ok);
        assert_eq!(s.phase(), AlertPhase::ArmedWaiting);
        assert_eq!(s.step(QualityLevel::Unhealthy, 0, ok), AlertOutcome::Waiting);
    }
}
