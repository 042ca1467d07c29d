// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized read-fold-append per aggregate
//!
//! Two layers keep appends linearizable per aggregate:
//!
//! - Threads in this process queue on a per-aggregate mutex, so they never
//!   race each other. Different aggregates use different mutexes.
//! - Other processes are caught by the sequence check in
//!   [`EventLog::commit`]; a lost race re-reads the history and tries again,
//!   up to the configured number of attempts.

use crate::error::LedgerError;
use crate::resolver::Resolver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tally_core::{AggregateState, Event, Projector, Record};
use tally_storage::{Backend, EventLog, StoreError};

/// An aggregate's records with the state recomputed from their raw events
#[derive(Debug, Clone)]
pub struct History {
    pub records: Vec<Record>,
    pub state: AggregateState,
}

impl History {
    pub fn next_sequence(&self) -> u64 {
        self.records.len() as u64 + 1
    }

    /// Snapshot stored with the latest record
    pub fn stored_state(&self) -> Option<AggregateState> {
        self.records.last().map(|r| r.state_snapshot)
    }
}

/// What to do after looking at an aggregate's history
pub enum Decision<T> {
    /// Append this event
    Append(Event),
    /// Finish without appending
    Done(T),
}

/// Mediates every append to the log
pub struct WriteCoordinator<B: Backend, P: Projector> {
    log: Arc<EventLog<B>>,
    projector: Arc<P>,
    max_attempts: u32,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<B: Backend, P: Projector> WriteCoordinator<B, P> {
    pub fn new(log: Arc<EventLog<B>>, projector: Arc<P>, max_attempts: u32) -> Self {
        Self {
            log,
            projector,
            max_attempts: max_attempts.max(1),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn log(&self) -> &EventLog<B> {
        &self.log
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Append `event` to the aggregate
    pub fn append(&self, aggregate_id: &str, event: Event) -> Result<Record, LedgerError> {
        self.append_with(aggregate_id, |_| Ok(Decision::Append(event.clone())))
    }

    /// Run `decide` against the aggregate's current history and append what
    /// it asks for, all inside the aggregate's critical section
    ///
    /// `decide` runs again on every retry, each time with fresh history.
    pub fn append_with<T, F>(&self, aggregate_id: &str, decide: F) -> Result<T, LedgerError>
    where
        T: From<Record>,
        F: FnMut(&History) -> Result<Decision<T>, LedgerError>,
    {
        let lock = self.aggregate_lock(aggregate_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.run(aggregate_id, decide)
        };
        self.release(aggregate_id, lock);
        result
    }

    fn run<T, F>(&self, aggregate_id: &str, mut decide: F) -> Result<T, LedgerError>
    where
        T: From<Record>,
        F: FnMut(&History) -> Result<Decision<T>, LedgerError>,
    {
        let resolver = Resolver::new(&self.log);

        for attempt in 1..=self.max_attempts {
            let records = resolver.records_for(aggregate_id)?;
            let state = self.projector.fold(records.iter().map(|r| &r.event))?;
            let history = History { records, state };

            let event = match decide(&history)? {
                Decision::Done(value) => return Ok(value),
                Decision::Append(event) => event,
            };
            let next_state = self.projector.apply(history.state, &event)?;
            let record = Record::new(aggregate_id, history.next_sequence(), event, next_state);

            match self.log.commit(record) {
                Ok(record) => return Ok(T::from(record)),
                Err(StoreError::Conflict { next, .. }) => {
                    tracing::debug!(aggregate_id, attempt, next, "lost append race; retrying");
                    std::thread::sleep(backoff(attempt));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            aggregate_id,
            attempts = self.max_attempts,
            "giving up on contended append"
        );
        Err(LedgerError::ConcurrencyConflict {
            aggregate_id: aggregate_id.to_string(),
            attempts: self.max_attempts,
        })
    }

    fn aggregate_lock(&self, aggregate_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(aggregate_id.to_string()).or_default())
    }

    /// Drop the aggregate's mutex from the table once nobody else holds it
    fn release(&self, aggregate_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the table, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(aggregate_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_micros(200 << attempt.min(6))
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
