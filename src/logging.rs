use anyhow::{Context, Result};
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const FILTER_ENV: &str = "HEARTWAVE_LOG";

/// Installs a file-backed subscriber. Stdout is the drawing surface, so
/// without a log file nothing is installed and events are dropped.
pub(crate) fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
