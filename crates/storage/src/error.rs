// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the record log and its backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt store: {detail}")]
    Corrupt { detail: String },
    #[error("cannot encode record: {0}")]
    Encode(#[from] serde_json::Error),
    /// The backend gained records since the last poll
    #[error("log advanced since it was last read")]
    Stale,
    /// The record's sequence number is no longer the next free one
    #[error("sequence conflict on '{aggregate_id}': attempted #{attempted}, next free is #{next}")]
    Conflict {
        aggregate_id: String,
        attempted: u64,
        next: u64,
    },
}

impl StoreError {
    pub(crate) fn unavailable(path: &Path, source: std::io::Error) -> Self {
        StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(detail: impl Into<String>) -> Self {
        StoreError::Corrupt {
            detail: detail.into(),
        }
    }
}
