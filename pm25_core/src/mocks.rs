//! Stand-in sinks used when a collaborator is not configured.

use pm25_traits::{AlertMessage, AlertNotifier, BoxError, StatusDisplay};

/// Display that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDisplay;

impl StatusDisplay for NoopDisplay {
    fn render(&mut self, _density: f32, _level_name: &str, _glyph: &str) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Notifier that accepts and drops every alert, so cooldown still applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl AlertNotifier for NoopNotifier {
    fn send_alert(&mut self, _alert: &AlertMessage) -> Result<(), BoxError> {
        Ok(())
    }
}
