// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log entry structure with checksum verification
//!
//! Each line of the log file is one entry: its global position, a timestamp,
//! the record, and a CRC32 of the serialized record.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tally_core::Record;

/// A single line in the record log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Position in the whole log, starting at 0
    pub position: u64,
    /// Microseconds since Unix epoch
    pub timestamp_micros: u64,
    pub record: Record,
    /// CRC32 checksum of the serialized record
    pub checksum: u32,
}

impl LogEntry {
    /// Create a new entry with computed checksum
    pub fn new(position: u64, record: Record) -> Result<Self, StoreError> {
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Self::new_with_timestamp(position, timestamp_micros, record)
    }

    /// Create a new entry with a specific timestamp (for testing)
    pub fn new_with_timestamp(
        position: u64,
        timestamp_micros: u64,
        record: Record,
    ) -> Result<Self, StoreError> {
        let checksum = Self::calculate_checksum(&record)?;
        Ok(Self {
            position,
            timestamp_micros,
            record,
            checksum,
        })
    }

    fn calculate_checksum(record: &Record) -> Result<u32, serde_json::Error> {
        let json = serde_json::to_string(record)?;
        Ok(crc32fast::hash(json.as_bytes()))
    }

    /// Verify the checksum matches the record
    pub fn verify(&self) -> bool {
        Self::calculate_checksum(&self.record)
            .map(|sum| sum == self.checksum)
            .unwrap_or(false)
    }

    /// Serialize to a single line of JSON, without the trailing newline
    pub fn to_line(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::from)
    }

    /// Parse from a single line of JSON
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
