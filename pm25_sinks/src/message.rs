//! Alert text shared by the Telegram and log notifiers.

use chrono::{DateTime, Local};
use pm25_traits::AlertMessage;

/// Render the alert body. Time is shown in local time.
pub fn format_alert(alert: &AlertMessage) -> String {
    let at: DateTime<Local> = alert.timestamp.into();
    let mut text = format!(
        "⚠️ PM2.5 ALERT\n\nValue: {:.1} µg/m³\nStatus: {}\nTime: {}",
        alert.density,
        alert.level_name,
        at.format("%Y-%m-%d %H:%M:%S"),
    );
    if !alert.advice.is_empty() {
        text.push_str("\n\n");
        text.push_str(alert.advice);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn alert(advice: &'static str) -> AlertMessage {
        AlertMessage {
            density: 187.3,
            level_name: "VERY BAD",
            advice,
            timestamp: SystemTime::now(),
        }
    }

    #[test]
    fn body_has_header_value_and_status() {
        let text = format_alert(&alert("Stay indoors and keep windows closed."));
        assert!(text.starts_with("⚠️ PM2.5 ALERT\n\n"));
        assert!(text.contains("Value: 187.3 µg/m³"));
        assert!(text.contains("Status: VERY BAD"));
        assert!(text.ends_with("\n\nStay indoors and keep windows closed."));
    }

    #[test]
    fn time_line_is_second_resolution() {
        let text = format_alert(&alert(""));
        let time = text
            .lines()
            .find_map(|l| l.strip_prefix("Time: "))
            .expect("time line");
        assert_eq!(time.len(), "2026-01-01 00:00:00".len());
        assert!(chrono::NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").is_ok());
        assert!(text.ends_with(time));
    }
}
