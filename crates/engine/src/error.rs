// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ledger commands

use tally_core::ProjectionError;
use tally_storage::StoreError;
use thiserror::Error;

/// Errors that can end a ledger command
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("concurrency conflict on '{aggregate_id}': gave up after {attempts} attempts")]
    ConcurrencyConflict { aggregate_id: String, attempts: u32 },
}

/// Coarse classification used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownEvent,
    InvalidSequence,
    InvalidEvent,
    StoreUnavailable,
    CorruptStore,
    ConcurrencyConflict,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Projection(ProjectionError::UnknownEvent { .. }) => ErrorKind::UnknownEvent,
            LedgerError::Projection(ProjectionError::InvalidSequence { .. }) => {
                ErrorKind::InvalidSequence
            }
            LedgerError::Projection(ProjectionError::InvalidEvent { .. }) => ErrorKind::InvalidEvent,
            LedgerError::Store(StoreError::Unavailable { .. }) => ErrorKind::StoreUnavailable,
            LedgerError::Store(StoreError::Encode(_)) => ErrorKind::StoreUnavailable,
            LedgerError::Store(StoreError::Corrupt { .. }) => ErrorKind::CorruptStore,
            LedgerError::Store(StoreError::Stale | StoreError::Conflict { .. })
            | LedgerError::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
        }
    }
}
