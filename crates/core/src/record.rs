// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted records

use crate::event::Event;
use crate::state::AggregateState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event as stored in the log, with its position and resulting state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub aggregate_id: String,
    /// Position within the aggregate's substream, starting at 1
    pub sequence_no: u64,
    pub event: Event,
    /// State after applying `event`; a cache, always re-derivable
    pub state_snapshot: AggregateState,
}

impl Record {
    pub fn new(
        aggregate_id: impl Into<String>,
        sequence_no: u64,
        event: Event,
        state_snapshot: AggregateState,
    ) -> Self {
        Self {
            aggregate_id: aggregate_id.into(),
            sequence_no,
            event,
            state_snapshot,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} -> {}",
            self.aggregate_id, self.sequence_no, self.event, self.state_snapshot
        )
    }
}
