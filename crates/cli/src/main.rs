// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally - append-only account ledger

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{account, audit, report};
use std::path::PathBuf;
use std::process::ExitCode;
use tally_core::Config;
use tally_engine::Ledger;

use crate::error::TallyError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "tally - append-only account ledger with replayable state"
)]
struct Cli {
    /// Config file (defaults to ./tally.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Event log file, overriding the config
    #[arg(long, global = true, env = "TALLY_DATA")]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an account, or reset an existing one
    Open(account::AccountArg),
    /// Deposit into an open account
    Deposit(account::DepositArgs),
    /// Close an account, keeping its balance
    Close(account::AccountArg),
    /// Show an account's current state
    State(account::AccountArg),
    /// Show an account's records in order
    History(account::AccountArg),
    /// Append a correction if the latest snapshot is stale
    Fix(account::AccountArg),
    /// Report snapshots that disagree with a fresh replay
    Verify(account::AccountArg),
    /// Show every record in the log
    List,
    /// Count accounts and total their balances
    Summary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = TallyError::from(err);
            eprint!("{}", err);
            ExitCode::from(err.exit_code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::discover(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config = config.with_data_path(data);
    }
    tracing::debug!(data = %config.data_path.display(), "using event log");

    let ledger = Ledger::open(&config)?;
    let format = cli.format;

    match cli.command {
        Commands::Open(args) => account::open(&ledger, &args.account, format),
        Commands::Deposit(args) => account::deposit(&ledger, &args.account, args.amount, format),
        Commands::Close(args) => account::close(&ledger, &args.account, format),
        Commands::State(args) => account::state(&ledger, &args.account, format),
        Commands::History(args) => account::history(&ledger, &args.account, format),
        Commands::Fix(args) => audit::fix(&ledger, &args.account, format),
        Commands::Verify(args) => audit::verify(&ledger, &args.account, format),
        Commands::List => report::list(&ledger, format),
        Commands::Summary => report::summary(&ledger, format),
    }
}

/// Diagnostics go to stderr so stdout stays parseable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
