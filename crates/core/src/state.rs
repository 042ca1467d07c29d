// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate state produced by the projector

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account that has been opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
}

/// Projected state of one aggregate
///
/// Absent until the first lifecycle event; serialized as `null` in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateState(Option<Account>);

impl AggregateState {
    /// Canonical state before any event
    pub const fn initial() -> Self {
        Self(None)
    }

    pub const fn open(balance: u64) -> Self {
        Self(Some(Account {
            balance,
            closed: false,
        }))
    }

    pub const fn closed(balance: u64) -> Self {
        Self(Some(Account {
            balance,
            closed: true,
        }))
    }

    pub fn account(&self) -> Option<&Account> {
        self.0.as_ref()
    }

    pub fn balance(&self) -> Option<u64> {
        self.0.map(|a| a.balance)
    }

    /// True once the aggregate has seen a lifecycle event
    pub fn exists(&self) -> bool {
        self.0.is_some()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.0, Some(Account { closed: false, .. }))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.0, Some(Account { closed: true, .. }))
    }
}

impl fmt::Display for AggregateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("none"),
            Some(Account {
                balance,
                closed: false,
            }) => write!(f, "{{balance: {}}}", balance),
            Some(Account {
                balance,
                closed: true,
            }) => write!(f, "{{balance: {}, closed}}", balance),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
