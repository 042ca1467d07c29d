// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-aggregate views of the log

use crate::error::LedgerError;
use tally_core::{AggregateState, Record};
use tally_storage::{Backend, EventLog, StoreError};

/// Resolves an aggregate id to its records, checking sequence integrity
pub struct Resolver<'a, B: Backend> {
    log: &'a EventLog<B>,
}

impl<'a, B: Backend> Resolver<'a, B> {
    pub fn new(log: &'a EventLog<B>) -> Self {
        Self { log }
    }

    /// The aggregate's records in append order, numbered exactly `1..=N`
    pub fn records_for(&self, aggregate_id: &str) -> Result<Vec<Record>, LedgerError> {
        let records = self.log.list(Some(aggregate_id))?;
        check_contiguous(aggregate_id, &records)?;
        Ok(records)
    }

    /// Snapshot of the latest record, or the initial state
    pub fn current_state(&self, aggregate_id: &str) -> Result<AggregateState, LedgerError> {
        Ok(self
            .records_for(aggregate_id)?
            .last()
            .map_or_else(AggregateState::initial, |r| r.state_snapshot))
    }
}

/// Verify that `records` are numbered `1..=N` in order
pub fn check_contiguous(aggregate_id: &str, records: &[Record]) -> Result<(), StoreError> {
    for (index, record) in records.iter().enumerate() {
        let expected = index as u64 + 1;
        if record.sequence_no != expected {
            let problem = if record.sequence_no < expected {
                "duplicate or out-of-order sequence"
            } else {
                "sequence gap"
            };
            return Err(StoreError::Corrupt {
                detail: format!(
                    "aggregate '{}': {} at record {}: expected #{}, found #{}",
                    aggregate_id,
                    problem,
                    index + 1,
                    expected,
                    record.sequence_no
                ),
            });
        }
    }
    Ok(())
}
