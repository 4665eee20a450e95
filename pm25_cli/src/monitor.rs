//! Config loading, collaborator assembly, and the `run` / `self-check` commands.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eyre::WrapErr;
use pm25_config::{Config, DisplayKind};
use pm25_core::error::{MonitorError, Result};
use pm25_core::mocks::NoopDisplay;
use pm25_core::{AlertOutcome, AlertPhase, Monitor, PersistOutcome, RunParams, RunSummary, TickStatus};
use pm25_hardware::util::PulseTiming;
use pm25_sinks::{ConsoleDisplay, InfluxConfig, InfluxStore, LogNotifier, TelegramConfig, TelegramNotifier};
use pm25_traits::{AlertNotifier, DustSensor, ReadingStore, StatusDisplay};
use serde_json::json;

use crate::cli::DEFAULT_CONFIG;

/// Load and validate the config. Without an explicit path the default file is
/// used when present, otherwise built-in defaults.
pub fn load_config(path: Option<&Path>, tick_ms_override: Option<u64>) -> Result<Config> {
    let path = match path {
        Some(p) => Some(p),
        None => Some(Path::new(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };
    let mut cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .wrap_err_with(|| format!("read config {}", p.display()))?;
            pm25_config::load_toml(&text)
                .wrap_err_with(|| format!("parse config {}", p.display()))?
        }
        None => Config::default(),
    };
    if let Some(ms) = tick_ms_override {
        cfg.timing.tick_ms = ms;
    }
    cfg.validate().map_err(|e| MonitorError::Config(format!("{e:#}")))?;
    Ok(cfg)
}

/// A calibration CSV, when given, replaces the `[calibration]` section.
pub fn load_calibration(csv: Option<&Path>, cfg: &Config) -> Result<pm25_config::Calibration> {
    match csv {
        Some(p) => {
            let cal = pm25_config::load_calibration_csv(p)
                .wrap_err_with(|| format!("read calibration {}", p.display()))?;
            tracing::info!(
                baseline_v = cal.baseline_v,
                scale = cal.scale,
                file = %p.display(),
                "calibration fitted from CSV"
            );
            Ok(cal)
        }
        None => Ok(cfg.calibration),
    }
}

fn pulse_timing(cfg: &Config) -> PulseTiming {
    PulseTiming::from_micros(cfg.sensor.settle_us, cfg.sensor.hold_us, cfg.sensor.recovery_us)
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn open_sensor(cfg: &Config) -> Result<Box<dyn DustSensor>> {
    let wiring = pm25_hardware::SensorWiring {
        i2c_bus: cfg.sensor.i2c_bus,
        adc_address: cfg.sensor.adc_address,
        adc_channel: cfg.sensor.adc_channel,
        led_pin: cfg.sensor.led_pin,
        led_active_low: cfg.sensor.led_active_low,
    };
    let sensor = pm25_hardware::HardwareDustSensor::new(wiring, pulse_timing(cfg))
        .map_err(|e| MonitorError::Startup(format!("open dust sensor: {e}")))?;
    Ok(Box::new(sensor))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn open_sensor(cfg: &Config) -> Result<Box<dyn DustSensor>> {
    tracing::info!("hardware support not compiled in; using simulated sensor");
    Ok(Box::new(
        pm25_hardware::SimulatedSensor::from_env().with_timing(pulse_timing(cfg)),
    ))
}

fn open_display(cfg: &Config, json: bool) -> Result<Box<dyn StatusDisplay>> {
    match cfg.display.kind {
        // JSON reports own stdout
        DisplayKind::Console if json => Ok(Box::new(NoopDisplay)),
        DisplayKind::Console => Ok(Box::new(ConsoleDisplay::stdout())),
        DisplayKind::None => Ok(Box::new(NoopDisplay)),
        DisplayKind::Sh1106 => open_oled(cfg),
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn open_oled(cfg: &Config) -> Result<Box<dyn StatusDisplay>> {
    let oled = pm25_hardware::Sh1106Display::new(cfg.display.i2c_bus, cfg.display.i2c_address)
        .map_err(|e| MonitorError::Startup(format!("open sh1106 display: {e}")))?;
    Ok(Box::new(oled))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn open_oled(_cfg: &Config) -> Result<Box<dyn StatusDisplay>> {
    Err(MonitorError::Startup(
        "display.kind = \"sh1106\" needs a build with the `hardware` feature".into(),
    )
    .into())
}

fn open_notifier(cfg: &Config) -> Box<dyn AlertNotifier> {
    match &cfg.telegram {
        Some(tg) => {
            // validate() guarantees a token is resolvable
            let bot_token = tg.resolved_token().unwrap_or_default();
            tracing::info!(chat_id = %tg.chat_id, "alerts go to telegram");
            Box::new(TelegramNotifier::new(TelegramConfig {
                api_base: tg.api_base.clone(),
                bot_token,
                chat_id: tg.chat_id.clone(),
                timeout: Duration::from_millis(tg.timeout_ms),
            }))
        }
        None => {
            tracing::info!("no [telegram] section; alerts go to the log");
            Box::new(LogNotifier)
        }
    }
}

fn open_store(cfg: &Config) -> Option<Box<dyn ReadingStore>> {
    let Some(influx) = &cfg.influxdb else {
        tracing::info!("no [influxdb] section; persistence disabled");
        return None;
    };
    tracing::info!(url = %influx.url, db = %influx.database, "persisting to influxdb");
    Some(Box::new(InfluxStore::new(InfluxConfig {
        url: influx.url.clone(),
        database: influx.database.clone(),
        username: influx.username.clone(),
        password: influx.password.clone(),
        measurement: cfg.storage.measurement.clone(),
        timeout: Duration::from_millis(influx.timeout_ms),
    })))
}

fn build_monitor(cfg: &Config, calibration: &pm25_config::Calibration, json: bool) -> Result<Monitor> {
    let sensor = open_sensor(cfg)?;
    let display = open_display(cfg, json)?;
    let mut builder = Monitor::builder()
        .with_sensor(sensor)
        .with_display(display)
        .with_notifier(open_notifier(cfg))
        .with_calibration(calibration.into())
        .with_filter((&cfg.filter).into())
        .with_alert((&cfg.alert).into())
        .with_timing((&cfg.timing).into())
        .with_storage((&cfg.storage).into());
    if let Some(store) = open_store(cfg) {
        builder = builder.with_store(store);
    }
    builder.build()
}

fn unix_ms(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn alert_name(a: &AlertOutcome) -> &'static str {
    match a {
        AlertOutcome::Quiet => "quiet",
        AlertOutcome::Sent => "sent",
        AlertOutcome::DeliveryFailed(_) => "delivery_failed",
        AlertOutcome::Cooling { .. } => "cooling",
        AlertOutcome::Waiting => "waiting",
        AlertOutcome::Cleared => "cleared",
    }
}

fn phase_name(p: AlertPhase) -> &'static str {
    match p {
        AlertPhase::Idle => "idle",
        AlertPhase::ArmedCooling => "armed_cooling",
        AlertPhase::ArmedWaiting => "armed_waiting",
    }
}

fn persist_name(p: &PersistOutcome) -> &'static str {
    match p {
        PersistOutcome::Disabled => "disabled",
        PersistOutcome::NotDue => "not_due",
        PersistOutcome::Written => "written",
        PersistOutcome::Failed(_) => "failed",
    }
}

/// One JSON line per tick; `n` counts skipped ticks too.
pub fn tick_json(n: u64, status: &TickStatus) -> serde_json::Value {
    match status {
        TickStatus::Completed(r) => json!({
            "tick": r.tick,
            "ts_ms": unix_ms(r.reading.timestamp),
            "voltage": r.reading.raw_voltage,
            "density_raw": r.reading.dust_density,
            "density": r.smoothed,
            "level": r.level.name(),
            "aqi": r.level.index(),
            "alert": alert_name(&r.alert),
            "alert_state": phase_name(r.alert_phase),
            "cooldown": r.cooldown_remaining,
            "display_ok": r.display_ok,
            "persist": persist_name(&r.persist),
        }),
        TickStatus::Skipped(e) => json!({
            "tick": n,
            "skipped": true,
            "error": e.to_string(),
        }),
    }
}

pub fn run_monitor(
    cfg: &Config,
    calibration: &pm25_config::Calibration,
    max_ticks: Option<u64>,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let monitor = build_monitor(cfg, calibration, json)?;
    let mut n = 0u64;
    let summary = pm25_core::run(monitor, RunParams { max_ticks }, &shutdown, |status| {
        n += 1;
        if json {
            println!("{}", tick_json(n, status));
        }
    });

    if json {
        println!(
            "{}",
            json!({
                "summary": {
                    "ticks": summary.ticks,
                    "skipped": summary.skipped,
                    "alerts_sent": summary.alerts_sent,
                    "delivery_failures": summary.delivery_failures,
                    "persisted": summary.persisted,
                    "last_level": summary.last_level.map(|l| l.name()),
                    "interrupted": summary.interrupted,
                }
            })
        );
    } else {
        println!(
            "stopped after {} ticks ({} skipped, {} alerts sent)",
            summary.ticks, summary.skipped, summary.alerts_sent
        );
    }
    Ok(summary)
}

/// Acquire the configured sensor and display, take one sample, and report.
pub fn self_check(cfg: &Config, calibration: &pm25_config::Calibration, json: bool) -> Result<()> {
    let mut sensor = open_sensor(cfg)?;
    let mut display = open_display(cfg, json)?;
    let voltage = sensor
        .read_voltage()
        .map_err(|e| MonitorError::sensor(&*e))?;
    let cal: pm25_core::Calibration = calibration.into();
    let density = cal.to_density(voltage);
    let (level, glyph) = pm25_core::classify(density);
    if let Err(e) = display.render(density, level.name(), glyph) {
        tracing::warn!(error = %e, "display test frame failed");
    }

    if json {
        println!(
            "{}",
            json!({
                "ok": true,
                "voltage": voltage,
                "density": density,
                "level": level.name(),
                "telegram": cfg.telegram.is_some(),
                "influxdb": cfg.influxdb.is_some(),
            })
        );
    } else {
        println!("sensor ok: {voltage:.3} V -> {density:.1} ug/m3 ({level})");
        println!(
            "alerts: {}, persistence: {}",
            if cfg.telegram.is_some() { "telegram" } else { "log" },
            if cfg.influxdb.is_some() { "influxdb" } else { "off" },
        );
    }
    Ok(())
}
