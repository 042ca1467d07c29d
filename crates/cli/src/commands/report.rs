// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-log commands

use crate::output::{print, print_list, OutputFormat};
use tally_engine::Ledger;
use tally_storage::Backend;

pub fn list<B: Backend>(ledger: &Ledger<B>, format: OutputFormat) -> anyhow::Result<()> {
    let records = ledger.list()?;
    print_list(&records, format, "No records");
    Ok(())
}

pub fn summary<B: Backend>(ledger: &Ledger<B>, format: OutputFormat) -> anyhow::Result<()> {
    let summary = ledger.summary()?;
    print(&summary, format);
    Ok(())
}
