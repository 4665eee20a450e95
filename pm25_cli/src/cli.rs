//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Keeps the non-blocking file writer flushing until process exit.
pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG: &str = "etc/pm25.toml";

#[derive(Parser, Debug)]
#[command(name = "pm25", version, about = "PM2.5 dust monitor")]
pub struct Cli {
    /// Path to config TOML (defaults to etc/pm25.toml if present, else built-in defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calibration CSV with header `voltage,density`; overrides [calibration]
    #[arg(long, value_name = "FILE")]
    pub calibration: Option<PathBuf>,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins if set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor loop until Ctrl-C (or --max-ticks)
    Run {
        /// Stop after this many ticks
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Override [timing] tick_ms
        #[arg(long, value_name = "MS")]
        tick_ms: Option<u64>,
    },
    /// Acquire the sensor, take one reading, and report it
    SelfCheck,
}
