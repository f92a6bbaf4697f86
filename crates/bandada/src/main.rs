// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bandada - a batch messaging dispatch engine.
//!
//! This is the binary entry point for the Bandada CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

mod check;
mod contacts;
mod history;
mod send;

/// Bandada - a batch messaging dispatch engine.
#[derive(Parser, Debug)]
#[command(name = "bandada", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (skips the XDG lookup).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch a message to every contact in a CSV file.
    Send(send::SendArgs),
    /// Validate a contact file offline and report what a run would do.
    Check(check::CheckArgs),
    /// Show past dispatch outcomes from the history database.
    History(history::HistoryArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            bandada_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.agent.log_level);
    debug!(agent = %config.agent.name, "config loaded");

    let result = match cli.command {
        Commands::Send(args) => send::run_send(args, &config).await,
        Commands::Check(args) => check::run_check(args, &config),
        Commands::History(args) => history::run_history(args, &config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<bandada_config::BandadaConfig, Vec<bandada_config::ConfigError>> {
    match path {
        Some(path) => match bandada_config::load_config_from_path(path) {
            Ok(config) => {
                bandada_config::validation::validate_config(&config)?;
                Ok(config)
            }
            Err(err) => Err(bandada_config::diagnostic::figment_to_config_errors(err)),
        },
        None => bandada_config::load_and_validate(),
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set.
fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("bandada={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received, letting an in-flight run stop at the next contact boundary.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), stopping after the current contact");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, stopping after the current contact");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, stopping after the current contact");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}
