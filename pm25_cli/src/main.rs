#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod error_fmt;
mod logging;
mod monitor;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use pm25_core::error::MonitorError;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{format_error_json, humanize};

fn main() {
    // clap exits with 2 on usage errors
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        tracing::error!(error = %err, "exiting after start-up failure");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    let tick_ms = match &cli.cmd {
        Commands::Run { tick_ms, .. } => *tick_ms,
        Commands::SelfCheck => None,
    };
    let cfg = monitor::load_config(cli.config.as_deref(), tick_ms)?;
    logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    let calibration = monitor::load_calibration(cli.calibration.as_deref(), &cfg)?;

    match cli.cmd {
        Commands::Run { max_ticks, .. } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .map_err(|e| MonitorError::Startup(format!("install Ctrl-C handler: {e}")))?;
            monitor::run_monitor(&cfg, &calibration, max_ticks, cli.json, shutdown)?;
        }
        Commands::SelfCheck => monitor::self_check(&cfg, &calibration, cli.json)?,
    }
    Ok(())
}
