//! Tracing subscriber setup: console layer plus optional rolling JSON file.

use std::path::Path;

use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::FILE_GUARD;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level precedence: RUST_LOG, then `--log-level`, then `[logging] level`, then info.
/// Console output goes to stderr so stdout stays free for display lines and JSON reports.
pub fn init(json: bool, cli_level: Option<&str>, cfg: &pm25_config::Logging) -> eyre::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => {
            let level = cli_level.or(cfg.level.as_deref()).unwrap_or("info");
            EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level '{level}'"))?
        }
    };

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    layers.push(if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    });

    if let Some(file) = cfg.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("create log directory {}", dir.display()))?;

        let appender = match cfg.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
