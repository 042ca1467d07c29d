// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Projection of event sequences into aggregate state
//!
//! A projector is a pure left fold: no I/O, no hidden state. Folding the same
//! events always yields the same state, which is what lets stored snapshots
//! be treated as a cache.

use crate::config::ReopenPolicy;
use crate::event::{Event, EventKind};
use crate::state::AggregateState;
use thiserror::Error;

/// Errors raised while folding events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("unknown event kind '{kind}'")]
    UnknownEvent { kind: String },
    #[error("{kind} cannot be applied to {state}: {reason}")]
    InvalidSequence {
        kind: EventKind,
        state: AggregateState,
        reason: &'static str,
    },
    #[error("invalid {kind} event: {reason}")]
    InvalidEvent { kind: EventKind, reason: String },
}

/// Rules for turning events into state
pub trait Projector: Send + Sync {
    /// State before any event has been applied
    fn initial(&self) -> AggregateState {
        AggregateState::initial()
    }

    /// Apply a single event
    fn apply(&self, state: AggregateState, event: &Event) -> Result<AggregateState, ProjectionError>;

    /// Fold an ordered sequence of events from the initial state
    fn fold<'a, I>(&self, events: I) -> Result<AggregateState, ProjectionError>
    where
        I: IntoIterator<Item = &'a Event>,
        Self: Sized,
    {
        events
            .into_iter()
            .try_fold(self.initial(), |state, event| self.apply(state, event))
    }
}

/// The shipped account rules
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountProjector {
    reopen: ReopenPolicy,
}

impl AccountProjector {
    pub fn new(reopen: ReopenPolicy) -> Self {
        Self { reopen }
    }

    fn open(&self, state: AggregateState) -> Result<AggregateState, ProjectionError> {
        if state.is_open() && self.reopen == ReopenPolicy::Reject {
            return Err(ProjectionError::InvalidSequence {
                kind: EventKind::OpenAccount,
                state,
                reason: "account is already open",
            });
        }
        Ok(AggregateState::open(0))
    }

    fn deposit(&self, state: AggregateState, amount: i64) -> Result<AggregateState, ProjectionError> {
        let amount = u64::try_from(amount).map_err(|_| ProjectionError::InvalidEvent {
            kind: EventKind::Deposit,
            reason: format!("amount must be non-negative, got {}", amount),
        })?;

        let Some(account) = state.account() else {
            return Err(ProjectionError::InvalidSequence {
                kind: EventKind::Deposit,
                state,
                reason: "account has not been opened",
            });
        };
        if account.closed {
            return Err(ProjectionError::InvalidSequence {
                kind: EventKind::Deposit,
                state,
                reason: "account is closed",
            });
        }

        let balance =
            account
                .balance
                .checked_add(amount)
                .ok_or_else(|| ProjectionError::InvalidEvent {
                    kind: EventKind::Deposit,
                    reason: format!("amount {} overflows balance {}", amount, account.balance),
                })?;
        Ok(AggregateState::open(balance))
    }

    fn close(&self, state: AggregateState) -> Result<AggregateState, ProjectionError> {
        match state.account() {
            Some(account) if !account.closed => Ok(AggregateState::closed(account.balance)),
            Some(_) => Err(ProjectionError::InvalidSequence {
                kind: EventKind::CloseAccount,
                state,
                reason: "account is already closed",
            }),
            None => Err(ProjectionError::InvalidSequence {
                kind: EventKind::CloseAccount,
                state,
                reason: "account has not been opened",
            }),
        }
    }
}

impl Projector for AccountProjector {
    fn apply(&self, state: AggregateState, event: &Event) -> Result<AggregateState, ProjectionError> {
        match event {
            Event::OpenAccount => self.open(state),
            Event::Deposit { amount } => self.deposit(state, *amount),
            Event::CloseAccount => self.close(state),
            Event::Fix => Ok(state),
            Event::Unrecognized(raw) => Err(match EventKind::parse(&raw.kind) {
                Some(kind) => ProjectionError::InvalidEvent {
                    kind,
                    reason: "payload could not be decoded".to_string(),
                },
                None => ProjectionError::UnknownEvent {
                    kind: raw.kind.clone(),
                },
            }),
        }
    }
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
