// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot maintenance commands

use crate::output::{print, OutputFormat};
use serde::Serialize;
use std::fmt;
use tally_engine::{Divergence, FixOutcome, Ledger};
use tally_storage::Backend;

#[derive(Serialize)]
struct FixReport<'a> {
    account: &'a str,
    #[serde(flatten)]
    outcome: FixOutcome,
}

impl fmt::Display for FixReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            FixOutcome::Missing => write!(f, "{}: no records, nothing to fix", self.account),
            FixOutcome::Consistent { state } => {
                write!(f, "{}: consistent at {}, nothing appended", self.account, state)
            }
            FixOutcome::Corrected { record } => write!(
                f,
                "{}: appended fix #{} -> {}",
                self.account, record.sequence_no, record.state_snapshot
            ),
        }
    }
}

#[derive(Serialize)]
struct VerifyReport<'a> {
    account: &'a str,
    divergent: Vec<Divergence>,
}

impl fmt::Display for VerifyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.divergent.is_empty() {
            return write!(f, "{}: all snapshots match", self.account);
        }
        write!(
            f,
            "{}: {} divergent snapshot(s)",
            self.account,
            self.divergent.len()
        )?;
        for d in &self.divergent {
            write!(
                f,
                "\n  #{:<4} stored {}, recomputed {}",
                d.sequence_no, d.stored, d.recomputed
            )?;
        }
        Ok(())
    }
}

pub fn fix<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = ledger.fix(account)?;
    print(&FixReport { account, outcome }, format);
    Ok(())
}

/// Divergence is a finding, not a failure; the command still succeeds
pub fn verify<B: Backend>(ledger: &Ledger<B>, account: &str, format: OutputFormat) -> anyhow::Result<()> {
    let divergent = ledger.verify(account)?;
    print(&VerifyReport { account, divergent }, format);
    Ok(())
}
