//! Finstat CLI
//!
//! Reads JSON documents, runs the statement engine, and prints JSON results.
//! Logs go to stderr so stdout stays machine-readable.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use finstat_shared::{AppConfig, AppError, LogFormat, LoggingConfig};

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (body, code) = match err.downcast_ref::<AppError>() {
                Some(app) => (commands::error_body(app), app.exit_code()),
                None => (
                    commands::error_body(&AppError::Internal(format!("{err:#}"))),
                    70,
                ),
            };
            eprintln!("{body}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = AppConfig::load_with(cli.config.as_deref());

    // Logging comes up even when configuration fails, using the defaults
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    let config = config?;
    debug!(
        balance_tolerance = %config.engine.balance_tolerance,
        "Configuration loaded"
    );

    let output = commands::execute(&cli.command, &config)?;

    let rendered = if cli.compact {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    }
    .context("failed to render output")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write output")?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let json = matches!(logging.format, LogFormat::Json);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}
