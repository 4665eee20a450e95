#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and calibration parsing for the dust monitor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Calibration CSV loader enforces headers and performs a robust refit
//!   to reduce outlier influence before slope/intercept estimation.
use serde::Deserialize;

/// Calibration CSV schema.
///
/// Expected headers:
/// voltage,density
///
/// Example:
/// voltage,density
/// 0.40,0.0
/// 0.90,90.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CalibrationRow {
    pub voltage: f32,
    pub density: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorCfg {
    pub i2c_bus: u8,
    /// ADS1115 I2C address
    pub adc_address: u16,
    /// ADS1115 single-ended input (0..=3)
    pub adc_channel: u8,
    /// BCM pin driving the sensor's IR LED
    pub led_pin: u8,
    pub led_active_low: bool,
    /// LED on -> sample delay (µs)
    pub settle_us: u64,
    /// sample -> LED off delay (µs)
    pub hold_us: u64,
    /// LED off -> next pulse delay (µs)
    pub recovery_us: u64,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            adc_address: 0x48,
            adc_channel: 0,
            led_pin: 24,
            led_active_low: true,
            settle_us: 280,
            hold_us: 0,
            recovery_us: 9_720,
        }
    }
}

impl SensorCfg {
    /// Length of one excitation pulse cycle in µs; `None` if the sum overflows.
    pub fn pulse_us(&self) -> Option<u64> {
        self.settle_us
            .checked_add(self.hold_us)?
            .checked_add(self.recovery_us)
    }
}

/// Persisted linear calibration: density = (voltage - baseline_v) * scale.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Calibration {
    /// Output voltage at zero dust (V). May be negative on some boards.
    pub baseline_v: f32,
    /// µg/m³ per volt above baseline
    pub scale: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            baseline_v: 0.4,
            scale: 180.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    /// Moving-average window size in ticks
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 10 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlertCfg {
    /// Ticks to stay quiet after a delivered alert
    pub cooldown_ticks: u32,
}

impl Default for AlertCfg {
    fn default() -> Self {
        Self {
            cooldown_ticks: 300,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimingCfg {
    /// Control loop period (ms)
    pub tick_ms: u64,
    /// Minimum time between storage writes (s)
    pub persist_every_s: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            persist_every_s: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    /// Value of the `location` tag on every stored point
    pub location: String,
    /// InfluxDB measurement name
    pub measurement: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            location: "home".into(),
            measurement: "dust".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InfluxCfg {
    /// e.g. http://localhost:8086
    pub url: String,
    pub database: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_influx_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_influx_timeout_ms() -> u64 {
    2_000
}

#[derive(Debug, Deserialize)]
pub struct TelegramCfg {
    /// Bot token; `PM25_TELEGRAM_TOKEN` overrides when set
    #[serde(default)]
    pub bot_token: Option<String>,
    pub chat_id: String,
    #[serde(default = "default_telegram_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
}

fn default_telegram_timeout_ms() -> u64 {
    10_000
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".into()
}

impl TelegramCfg {
    /// Token from the environment if present, else from the file.
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var("PM25_TELEGRAM_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.bot_token.clone())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// One status line per frame on stdout
    #[default]
    Console,
    /// SH1106 OLED (hardware builds only)
    Sh1106,
    None,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    pub kind: DisplayKind,
    pub i2c_bus: u8,
    pub i2c_address: u8,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            kind: DisplayKind::Console,
            i2c_bus: 1,
            i2c_address: 0x3C,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorCfg,
    #[serde(default)]
    pub calibration: Calibration,
    #[serde(default)]
    pub filter: FilterCfg,
    #[serde(default)]
    pub alert: AlertCfg,
    #[serde(default)]
    pub timing: TimingCfg,
    #[serde(default)]
    pub storage: StorageCfg,
    /// Time-series sink; persistence is off when absent
    #[serde(default)]
    pub influxdb: Option<InfluxCfg>,
    /// Alert channel; alerts go to the log when absent
    #[serde(default)]
    pub telegram: Option<TelegramCfg>,
    #[serde(default)]
    pub display: DisplayCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Calibration {
    /// Fit `density = slope * voltage + intercept` over reference rows using
    /// ordinary least squares, then convert to baseline/scale form:
    /// scale = slope, baseline_v = -intercept / slope (voltage at zero dust).
    pub fn from_rows(rows: Vec<CalibrationRow>) -> eyre::Result<Self> {
        if rows.len() < 2 {
            eyre::bail!("calibration requires at least two rows, got {}", rows.len());
        }
        for (i, r) in rows.iter().enumerate() {
            if !r.voltage.is_finite() || !r.density.is_finite() {
                eyre::bail!("calibration row {} has a non-finite value", i + 2);
            }
            if r.density < 0.0 {
                eyre::bail!("calibration row {} has negative density", i + 2);
            }
        }

        // Closure: OLS fit in f64 for numerical stability
        let fit = |pts: &[(f32, f32)]| -> eyre::Result<(f64, f64)> {
            let n = pts.len() as f64;
            let mean_x: f64 = pts.iter().map(|r| f64::from(r.0)).sum::<f64>() / n;
            let mean_y: f64 = pts.iter().map(|r| f64::from(r.1)).sum::<f64>() / n;
            let mut sxx = 0.0f64;
            let mut sxy = 0.0f64;
            for (vx, dy) in pts {
                let x = f64::from(*vx) - mean_x;
                let y = f64::from(*dy) - mean_y;
                sxx += x * x;
                sxy += x * y;
            }
            if !sxx.is_finite() || sxx == 0.0 {
                eyre::bail!("calibration cannot determine slope (all voltages equal)");
            }
            let a = sxy / sxx;
            if !a.is_finite() || a <= 0.0 {
                eyre::bail!("calibration slope must be positive (density rises with voltage)");
            }
            Ok((a, mean_y - a * mean_x))
        };

        let pts: Vec<(f32, f32)> = rows.iter().map(|r| (r.voltage, r.density)).collect();
        let (a0, b0) = fit(&pts)?;
        let sumsq: f64 = pts
            .iter()
            .map(|(x, y)| {
                let r = f64::from(*y) - (a0 * f64::from(*x) + b0);
                r * r
            })
            .sum();
        let rms = (sumsq / pts.len() as f64).sqrt();

        // Reject outliers with |residual| > 2σ and refit if at least 2 remain.
        let (a, b) = robust_refit(&pts, a0, b0, rms, 2.0).unwrap_or((a0, b0));

        let baseline = (-b / a) as f32;
        let scale = a as f32;
        if !baseline.is_finite() {
            eyre::bail!("calibration produced invalid baseline voltage");
        }
        if !(scale.is_finite() && scale > 0.0) {
            eyre::bail!("calibration slope is out of range");
        }
        Ok(Self {
            baseline_v: baseline,
            scale,
        })
    }
}

/// Single-step robust refit: drop points with |residual| > k * rms around
/// y = a0*x + b0 and refit the inliers with an online (Welford) covariance.
/// Returns None when a refit is not applicable, so the caller keeps (a0, b0).
fn robust_refit(pts: &[(f32, f32)], a0: f64, b0: f64, rms: f64, k: f64) -> Option<(f64, f64)> {
    if !(rms.is_finite() && rms > 0.0 && k.is_finite() && k > 0.0) {
        return None;
    }
    let thr = k * rms;
    let mut n_in: usize = 0;
    let mut mean_x = 0.0f64;
    let mut mean_y = 0.0f64;
    let mut cxx = 0.0f64;
    let mut cxy = 0.0f64;

    for (x_i, y_i) in pts {
        let x = f64::from(*x_i);
        let y = f64::from(*y_i);
        if (y - (a0 * x + b0)).abs() <= thr {
            n_in += 1;
            let n = n_in as f64;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            cxx += dx * (x - mean_x);
            cxy += dx * (y - mean_y);
        }
    }

    if n_in < 2 || n_in == pts.len() || !cxx.is_finite() || cxx == 0.0 {
        return None;
    }
    let a = cxy / cxx;
    if !a.is_finite() || a <= 0.0 {
        return None;
    }
    Some((a, mean_y - a * mean_x))
}

impl TryFrom<Vec<CalibrationRow>> for Calibration {
    type Error = eyre::Report;
    fn try_from(rows: Vec<CalibrationRow>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

pub fn load_calibration_csv(path: &std::path::Path) -> eyre::Result<Calibration> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["voltage", "density"];
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    if actual != expected {
        eyre::bail!(
            "calibration CSV must have headers 'voltage,density', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<CalibrationRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    Calibration::try_from(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if self.sensor.adc_channel > 3 {
            eyre::bail!("sensor.adc_channel must be in 0..=3");
        }
        if self.sensor.settle_us == 0 {
            eyre::bail!("sensor.settle_us must be >= 1");
        }
        let pulse_us = match self.sensor.pulse_us() {
            Some(us) if us <= 1_000_000 => us,
            _ => eyre::bail!("sensor pulse (settle_us + hold_us + recovery_us) must be <= 1s"),
        };

        // Calibration
        if !self.calibration.baseline_v.is_finite() {
            eyre::bail!("calibration.baseline_v must be finite");
        }
        if !(self.calibration.scale.is_finite() && self.calibration.scale > 0.0) {
            eyre::bail!("calibration.scale must be > 0");
        }

        // Filter
        if self.filter.window == 0 {
            eyre::bail!("filter.window must be >= 1");
        }
        if self.filter.window > 3_600 {
            eyre::bail!("filter.window is unreasonably large (>3600)");
        }

        // Timing
        if self.timing.tick_ms == 0 {
            eyre::bail!("timing.tick_ms must be >= 1");
        }
        let pulse_ms = pulse_us.div_ceil(1_000);
        if self.timing.tick_ms < pulse_ms {
            eyre::bail!("timing.tick_ms must cover one sensor pulse ({pulse_ms} ms)");
        }

        // Storage
        if self.storage.location.trim().is_empty() {
            eyre::bail!("storage.location must not be empty");
        }
        if self.storage.measurement.trim().is_empty() {
            eyre::bail!("storage.measurement must not be empty");
        }
        if let Some(influx) = &self.influxdb {
            if !(influx.url.starts_with("http://") || influx.url.starts_with("https://")) {
                eyre::bail!("influxdb.url must start with http:// or https://");
            }
            if influx.database.trim().is_empty() {
                eyre::bail!("influxdb.database must not be empty");
            }
            if influx.timeout_ms == 0 {
                eyre::bail!("influxdb.timeout_ms must be >= 1");
            }
        }

        // Messaging
        if let Some(tg) = &self.telegram {
            if tg.chat_id.trim().is_empty() {
                eyre::bail!("telegram.chat_id must not be empty");
            }
            if tg.resolved_token().is_none() {
                eyre::bail!("telegram.bot_token missing (set it or PM25_TELEGRAM_TOKEN)");
            }
            if tg.timeout_ms == 0 {
                eyre::bail!("telegram.timeout_ms must be >= 1");
            }
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
