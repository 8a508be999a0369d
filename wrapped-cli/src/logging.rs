use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The viewer owns the terminal; log lines go to ~/.wrapped/wrapped.log.
    File,
    Stderr,
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()))
}

pub fn init(target: LogTarget, default_level: &str) -> Result<()> {
    let (file_layer, stderr_layer) = match target {
        LogTarget::File => {
            let path = state::log_path()?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        LogTarget::Stderr => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}
