// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable sequence backends

use crate::error::StoreError;
use std::sync::{Arc, Mutex, PoisonError};
use tally_core::Record;

/// A durable, ordered sequence of records shared by any number of writers
///
/// Implementations only move records to and from storage; ordering rules
/// per aggregate are enforced by [`EventLog`](crate::EventLog).
pub trait Backend: Send {
    /// Records committed by anyone since the previous poll, in log order
    ///
    /// The first poll returns the whole log. A missing store reads as empty.
    fn poll(&mut self) -> Result<Vec<Record>, StoreError>;

    /// Durably append one record
    ///
    /// Fails with [`StoreError::Stale`] without writing anything if the log
    /// gained records since the last poll.
    fn append(&mut self, record: &Record) -> Result<(), StoreError>;
}

/// In-memory backend
///
/// Handles obtained with [`MemoryBackend::connect`] share one sequence but
/// track their own read position, like separate processes on one file.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    shared: Arc<Mutex<Vec<Record>>>,
    seen: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from records that are already stored
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(records)),
            seen: 0,
        }
    }

    /// Another handle on the same sequence, positioned at its start
    pub fn connect(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            seen: 0,
        }
    }

    /// Everything stored so far
    pub fn records(&self) -> Vec<Record> {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Backend for MemoryBackend {
    fn poll(&mut self) -> Result<Vec<Record>, StoreError> {
        let records = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = records[self.seen..].to_vec();
        self.seen = records.len();
        Ok(fresh)
    }

    fn append(&mut self, record: &Record) -> Result<(), StoreError> {
        let mut records = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() != self.seen {
            return Err(StoreError::Stale);
        }
        records.push(record.clone());
        self.seen = records.len();
        Ok(())
    }
}
