// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The record log
//!
//! `EventLog` owns the backend and an in-memory index of every record read
//! from it. Reads are served from the index after pulling whatever other
//! writers committed; a record enters the index only once the backend has
//! durably stored it, so readers never observe a partial append.

use crate::backend::Backend;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{
    Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
};
use tally_core::Record;

/// Retries of a physical append that lost to writes for other aggregates
const MAX_STALE_RETRIES: u32 = 32;

#[derive(Debug, Default)]
struct Index {
    records: Vec<Record>,
    /// Offsets into `records`, per aggregate, in log order
    streams: HashMap<String, Vec<usize>>,
    /// Aggregate ids in order of first appearance
    aggregates: Vec<String>,
}

impl Index {
    fn ingest(&mut self, record: Record) {
        let offset = self.records.len();
        match self.streams.get_mut(&record.aggregate_id) {
            Some(stream) => stream.push(offset),
            None => {
                self.aggregates.push(record.aggregate_id.clone());
                self.streams
                    .insert(record.aggregate_id.clone(), vec![offset]);
            }
        }
        self.records.push(record);
    }

    fn next_sequence(&self, aggregate_id: &str) -> u64 {
        self.streams
            .get(aggregate_id)
            .and_then(|stream| stream.last())
            .map_or(1, |&offset| self.records[offset].sequence_no + 1)
    }

    fn select(&self, aggregate_id: Option<&str>) -> Vec<Record> {
        match aggregate_id {
            None => self.records.clone(),
            Some(id) => self
                .streams
                .get(id)
                .map(|stream| {
                    stream
                        .iter()
                        .map(|&offset| self.records[offset].clone())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Append-only, totally ordered log of records across all aggregates
pub struct EventLog<B: Backend> {
    backend: Mutex<B>,
    index: RwLock<Index>,
}

impl<B: Backend> EventLog<B> {
    /// Open a log over `backend`, reading everything already stored
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let log = Self {
            backend: Mutex::new(backend),
            index: RwLock::new(Index::default()),
        };
        let loaded = log.refresh()?;
        tracing::debug!(records = loaded, "event log opened");
        Ok(log)
    }

    /// Pull records committed by other writers; returns how many arrived
    fn refresh(&self) -> Result<usize, StoreError> {
        let mut backend = self.lock_backend();
        self.pull(&mut backend)
    }

    /// All records, or those of one aggregate, in append order
    pub fn list(&self, aggregate_id: Option<&str>) -> Result<Vec<Record>, StoreError> {
        self.catch_up()?;
        Ok(self.read_index().select(aggregate_id))
    }

    /// Aggregate ids in order of first appearance
    pub fn aggregate_ids(&self) -> Result<Vec<String>, StoreError> {
        self.catch_up()?;
        Ok(self.read_index().aggregates.clone())
    }

    /// Pull new records unless a commit holds the backend
    ///
    /// Readers that skip the poll see the log as it stood when the commit in
    /// flight pulled.
    fn catch_up(&self) -> Result<(), StoreError> {
        match self.backend.try_lock() {
            Ok(mut backend) => self.pull(&mut backend).map(drop),
            Err(TryLockError::Poisoned(poisoned)) => {
                self.pull(&mut poisoned.into_inner()).map(drop)
            }
            Err(TryLockError::WouldBlock) => Ok(()),
        }
    }

    /// Number of records currently indexed
    pub fn len(&self) -> usize {
        self.read_index().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Durably append `record` if its sequence number is the next free one
    /// for its aggregate
    ///
    /// Fails with [`StoreError::Conflict`] when another writer already used
    /// that sequence number; nothing is written in that case.
    pub fn commit(&self, record: Record) -> Result<Record, StoreError> {
        let mut backend = self.lock_backend();

        for _ in 0..=MAX_STALE_RETRIES {
            self.pull(&mut backend)?;
            let next = self.read_index().next_sequence(&record.aggregate_id);
            if record.sequence_no != next {
                tracing::debug!(
                    aggregate_id = %record.aggregate_id,
                    attempted = record.sequence_no,
                    next,
                    "sequence already taken"
                );
                return Err(StoreError::Conflict {
                    aggregate_id: record.aggregate_id,
                    attempted: record.sequence_no,
                    next,
                });
            }

            match backend.append(&record) {
                Ok(()) => {
                    tracing::info!(
                        aggregate_id = %record.aggregate_id,
                        sequence_no = record.sequence_no,
                        kind = record.event.kind_name(),
                        "record committed"
                    );
                    self.write_index().ingest(record.clone());
                    return Ok(record);
                }
                // Another writer got in first; re-read and check again
                Err(StoreError::Stale) => continue,
                Err(e) => return Err(e),
            }
        }

        let next = self.read_index().next_sequence(&record.aggregate_id);
        tracing::warn!(
            aggregate_id = %record.aggregate_id,
            "log kept advancing under append"
        );
        Err(StoreError::Conflict {
            aggregate_id: record.aggregate_id,
            attempted: record.sequence_no,
            next,
        })
    }

    fn pull(&self, backend: &mut B) -> Result<usize, StoreError> {
        let fresh = backend.poll()?;
        let count = fresh.len();
        if count > 0 {
            let mut index = self.write_index();
            for record in fresh {
                index.ingest(record);
            }
        }
        Ok(count)
    }

    fn lock_backend(&self) -> MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_index(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, Index> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
