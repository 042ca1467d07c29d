// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command surface over one event log

use crate::coordinator::WriteCoordinator;
use crate::correction::{CorrectionHandler, Divergence, FixOutcome};
use crate::error::LedgerError;
use crate::resolver::Resolver;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tally_core::{AccountProjector, AggregateState, Config, Event, Projector, Record};
use tally_storage::{Backend, EventLog, FileBackend};

/// Whole-log view: every account folded to its current state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub accounts: usize,
    pub open: usize,
    pub closed: usize,
    pub total_balance: u64,
}

impl Summary {
    fn add(&mut self, state: &AggregateState) {
        let Some(account) = state.account() else {
            return;
        };
        self.accounts += 1;
        if account.closed {
            self.closed += 1;
        } else {
            self.open += 1;
        }
        self.total_balance = self.total_balance.saturating_add(account.balance);
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accounts: {} ({} open, {} closed)\ntotal balance: {}",
            self.accounts, self.open, self.closed, self.total_balance
        )
    }
}

/// An account ledger backed by an event log
pub struct Ledger<B: Backend, P: Projector = AccountProjector> {
    coordinator: WriteCoordinator<B, P>,
}

impl Ledger<FileBackend> {
    /// Open the data file named by `config`, creating it if needed
    pub fn open(config: &Config) -> Result<Self, LedgerError> {
        let backend = FileBackend::open(&config.data_path)?;
        let log = EventLog::open(backend)?;
        tracing::debug!(
            path = %config.data_path.display(),
            records = log.len(),
            "ledger opened"
        );
        Ok(Self::new(
            Arc::new(log),
            AccountProjector::new(config.reopen),
            config.max_append_attempts,
        ))
    }
}

impl<B: Backend, P: Projector> Ledger<B, P> {
    pub fn new(log: Arc<EventLog<B>>, projector: P, max_append_attempts: u32) -> Self {
        Self {
            coordinator: WriteCoordinator::new(log, Arc::new(projector), max_append_attempts),
        }
    }

    pub fn log(&self) -> &EventLog<B> {
        self.coordinator.log()
    }

    pub fn open_account(&self, aggregate_id: &str) -> Result<Record, LedgerError> {
        self.append(aggregate_id, Event::OpenAccount)
    }

    pub fn deposit(&self, aggregate_id: &str, amount: i64) -> Result<Record, LedgerError> {
        self.append(aggregate_id, Event::deposit(amount))
    }

    pub fn close_account(&self, aggregate_id: &str) -> Result<Record, LedgerError> {
        self.append(aggregate_id, Event::CloseAccount)
    }

    /// Append any event, validated against the aggregate's current state
    pub fn append(&self, aggregate_id: &str, event: Event) -> Result<Record, LedgerError> {
        self.coordinator.append(aggregate_id, event)
    }

    pub fn state(&self, aggregate_id: &str) -> Result<AggregateState, LedgerError> {
        Resolver::new(self.log()).current_state(aggregate_id)
    }

    pub fn history(&self, aggregate_id: &str) -> Result<Vec<Record>, LedgerError> {
        Resolver::new(self.log()).records_for(aggregate_id)
    }

    /// Every record in the log, in append order
    pub fn list(&self) -> Result<Vec<Record>, LedgerError> {
        Ok(self.log().list(None)?)
    }

    pub fn fix(&self, aggregate_id: &str) -> Result<FixOutcome, LedgerError> {
        CorrectionHandler::new(&self.coordinator).fix(aggregate_id)
    }

    pub fn verify(&self, aggregate_id: &str) -> Result<Vec<Divergence>, LedgerError> {
        CorrectionHandler::new(&self.coordinator).verify(aggregate_id)
    }

    /// Fold every aggregate from its raw events and tally the results
    pub fn summary(&self) -> Result<Summary, LedgerError> {
        let resolver = Resolver::new(self.log());
        let projector = self.coordinator.projector();

        let mut summary = Summary::default();
        for aggregate_id in self.log().aggregate_ids()? {
            let records = resolver.records_for(&aggregate_id)?;
            let state = projector.fold(records.iter().map(|r| &r.event))?;
            summary.add(&state);
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
