// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot correction
//!
//! Stored snapshots are a cache of the fold. When projection rules change,
//! old snapshots go stale; `fix` appends a `fix` record carrying the state the
//! current rules compute, and `verify` reports which snapshots disagree.

use crate::coordinator::{Decision, WriteCoordinator};
use crate::error::LedgerError;
use crate::resolver::Resolver;
use serde::Serialize;
use tally_core::{AggregateState, Event, Projector, Record};
use tally_storage::Backend;

/// Result of a `fix`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FixOutcome {
    /// The aggregate has no records
    Missing,
    /// The latest snapshot already matches the recomputed state
    Consistent { state: AggregateState },
    /// A `fix` record was appended
    Corrected { record: Record },
}

impl FixOutcome {
    pub fn appended(&self) -> bool {
        matches!(self, FixOutcome::Corrected { .. })
    }
}

impl From<Record> for FixOutcome {
    fn from(record: Record) -> Self {
        FixOutcome::Corrected { record }
    }
}

/// A stored snapshot that the current rules would not produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Divergence {
    pub sequence_no: u64,
    pub stored: AggregateState,
    pub recomputed: AggregateState,
}

pub struct CorrectionHandler<'a, B: Backend, P: Projector> {
    coordinator: &'a WriteCoordinator<B, P>,
}

impl<'a, B: Backend, P: Projector> CorrectionHandler<'a, B, P> {
    pub fn new(coordinator: &'a WriteCoordinator<B, P>) -> Self {
        Self { coordinator }
    }

    /// Bring the aggregate's latest snapshot in line with the current rules
    ///
    /// Runs inside the aggregate's critical section, so no append can slip in
    /// between the comparison and the `fix` record.
    pub fn fix(&self, aggregate_id: &str) -> Result<FixOutcome, LedgerError> {
        self.coordinator.append_with(aggregate_id, |history| {
            let Some(stored) = history.stored_state() else {
                return Ok(Decision::Done(FixOutcome::Missing));
            };
            if stored == history.state {
                tracing::debug!(aggregate_id, "snapshot consistent");
                return Ok(Decision::Done(FixOutcome::Consistent { state: stored }));
            }
            tracing::info!(
                aggregate_id,
                stored = %stored,
                recomputed = %history.state,
                "correcting stale snapshot"
            );
            Ok(Decision::Append(Event::Fix))
        })
    }

    /// Every record whose stored snapshot differs from the running fold
    pub fn verify(&self, aggregate_id: &str) -> Result<Vec<Divergence>, LedgerError> {
        let records = Resolver::new(self.coordinator.log()).records_for(aggregate_id)?;
        let projector = self.coordinator.projector();

        let mut state = projector.initial();
        let mut divergent = Vec::new();
        for record in &records {
            state = projector.apply(state, &record.event)?;
            if record.state_snapshot != state {
                divergent.push(Divergence {
                    sequence_no: record.sequence_no,
                    stored: record.state_snapshot,
                    recomputed: state,
                });
            }
        }

        tracing::debug!(
            aggregate_id,
            records = records.len(),
            divergent = divergent.len(),
            "verified snapshots"
        );
        Ok(divergent)
    }
}

#[cfg(test)]
#[path = "correction_tests.rs"]
mod tests;
