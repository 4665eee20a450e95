//! Human-readable error descriptions and structured JSON error formatting.

use pm25_core::error::{BuildError, MonitorError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => {
                "What happened: No dust sensor was provided to the monitor.\nLikely causes: The sensor driver failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sensor is created successfully and passed via with_sensor(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/pm25.toml for a sample."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::SensorUnavailable(detail) => format!(
                "What happened: The dust sensor could not be read ({detail}).\nLikely causes: ADC not on the I2C bus, wrong [sensor] address or channel, or the LED pin is held by another process.\nHow to fix: Check wiring and the [sensor] section, confirm the ADC shows up in `i2cdetect -y 1`, then rerun `pm25 self-check`."
            ),
            MonitorError::Startup(detail) => format!(
                "What happened: Start-up failed ({detail}).\nLikely causes: Hardware not present, missing permissions for GPIO/I2C, or a feature not compiled in.\nHow to fix: Check the [sensor] and [display] sections and run as a user in the gpio and i2c groups."
            ),
            MonitorError::Config(detail) => format!(
                "What happened: Configuration is invalid ({detail}).\nLikely causes: Out-of-range values or a missing required key.\nHow to fix: Edit the TOML config and try again. See etc/pm25.toml for a sample."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = format!("{err:#}").to_ascii_lowercase();
    let root = err.root_cause().to_string();

    if lower.contains("calibration csv must have headers") {
        return "Invalid headers in calibration CSV. Expected 'voltage,density'.".to_string();
    }

    if lower.contains("invalid csv row") {
        return format!(
            "What happened: Calibration CSV could not be parsed ({root}).\nLikely causes: A non-numeric value or a missing column.\nHow to fix: Each row must be `<volts>,<ug/m3>`; fix the row and rerun."
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this program.\nLikely causes: A typo in a key or section name, or a wrong value type.\nHow to fix: Compare against etc/pm25.toml. Detail: {root}"
        );
    }

    if lower.contains("read config") || lower.contains("read calibration") {
        return format!(
            "What happened: {msg}.\nLikely causes: The path is wrong or not readable.\nHow to fix: Pass an existing file. Detail: {root}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Error: {msg}"
    )
}

/// Stable reason names for JSON consumers.
fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => "MissingSensor",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::SensorUnavailable(_) => "SensorUnavailable",
            MonitorError::DeliveryFailed { .. } => "DeliveryFailed",
            MonitorError::Startup(_) => "Startup",
            MonitorError::Config(_) => "Config",
        };
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
