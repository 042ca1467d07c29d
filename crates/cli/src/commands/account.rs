// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-account commands

use crate::output::{print, print_list, OutputFormat};
use clap::Args;
use tally_engine::Ledger;
use tally_storage::Backend;

#[derive(Args)]
pub struct AccountArg {
    /// Account id
    pub account: String,
}

#[derive(Args)]
pub struct DepositArgs {
    /// Account id
    pub account: String,
    /// Amount to deposit
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

pub fn open<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let record = ledger.open_account(account)?;
    print(&record, format);
    Ok(())
}

pub fn deposit<B: Backend>(
    ledger: &Ledger<B>,
    account: &str,
    amount: i64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let record = ledger.deposit(account, amount)?;
    print(&record, format);
    Ok(())
}

pub fn close<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let record = ledger.close_account(account)?;
    print(&record, format);
    Ok(())
}

pub fn state<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let state = ledger.state(account)?;
    print(&state, format);
    Ok(())
}

pub fn history<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let records = ledger.history(account)?;
    print_list(&records, format, &format!("No records for '{}'", account));
    Ok(())
}
