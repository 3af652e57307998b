mod command;
mod desk;

use anyhow::{Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader},
    sync::Arc,
};

use orderdesk_core::config::{self, AppConfig};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::desk::Desk;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config)?;
    config::ensure_default_config()?;

    let mut desk =
        Desk::new(config.currency_symbol.clone()).with_report_format(config.report_format);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match std::env::args().nth(1) {
        Some(path) => {
            info!("reading commands from {path}");
            let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
            desk::run(&mut desk, BufReader::new(file), &mut out, config.echo_commands)?
        }
        None => desk::run(&mut desk, io::stdin().lock(), &mut out, config.echo_commands)?,
    };

    if summary.failed > 0 {
        eprintln!(
            "{} command(s) applied, {} failed",
            summary.applied, summary.failed
        );
    }
    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = &config.log_dir;
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("orderdesk.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    // stdout carries command output, so console logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
