// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Account events
//!
//! Events are a closed tagged union. On disk every event has the loose shape
//! `{"kind": "...", "payload": {...}}`; decoding never fails on an unfamiliar
//! kind so that a log written by a newer build can still be listed. The
//! projector is what rejects events it cannot fold.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The kinds of event this build understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OpenAccount,
    Deposit,
    CloseAccount,
    Fix,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::OpenAccount,
        EventKind::Deposit,
        EventKind::CloseAccount,
        EventKind::Fix,
    ];

    /// Persisted name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OpenAccount => "open_account",
            EventKind::Deposit => "deposit",
            EventKind::CloseAccount => "close_account",
            EventKind::Fix => "fix",
        }
    }

    /// Look up a kind by its persisted name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted shape of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// Something that happened to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEvent", into = "RawEvent")]
pub enum Event {
    /// Account created (or reset) with a zero balance
    OpenAccount,
    /// Money added to an open account
    Deposit { amount: i64 },
    /// Account closed; balance is kept but no longer changes
    CloseAccount,
    /// Correction marker; carries no change of its own
    Fix,
    /// Kind or payload this build cannot decode, kept verbatim
    Unrecognized(RawEvent),
}

impl Event {
    pub fn deposit(amount: i64) -> Self {
        Event::Deposit { amount }
    }

    /// Recognized kind, if any
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Event::OpenAccount => Some(EventKind::OpenAccount),
            Event::Deposit { .. } => Some(EventKind::Deposit),
            Event::CloseAccount => Some(EventKind::CloseAccount),
            Event::Fix => Some(EventKind::Fix),
            Event::Unrecognized(_) => None,
        }
    }

    /// Kind name as persisted, including unrecognized kinds
    pub fn kind_name(&self) -> &str {
        match self {
            Event::Unrecognized(raw) => &raw.kind,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

// Typed variants are only produced when the payload has exactly the expected
// fields, so re-encoding a decoded event reproduces what was stored.
impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let typed = match (EventKind::parse(&raw.kind), raw.payload.len()) {
            (Some(EventKind::OpenAccount), 0) => Some(Event::OpenAccount),
            (Some(EventKind::CloseAccount), 0) => Some(Event::CloseAccount),
            (Some(EventKind::Fix), 0) => Some(Event::Fix),
            (Some(EventKind::Deposit), 1) => raw
                .payload
                .get("amount")
                .and_then(Value::as_i64)
                .map(|amount| Event::Deposit { amount }),
            _ => None,
        };
        typed.unwrap_or(Event::Unrecognized(raw))
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::OpenAccount => RawEvent::new(EventKind::OpenAccount.as_str()),
            Event::Deposit { amount } => {
                RawEvent::new(EventKind::Deposit.as_str()).with_field("amount", amount)
            }
            Event::CloseAccount => RawEvent::new(EventKind::CloseAccount.as_str()),
            Event::Fix => RawEvent::new(EventKind::Fix.as_str()),
            Event::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Deposit { amount } => write!(f, "deposit {}", amount),
            Event::Unrecognized(raw) => {
                write!(f, "{} {}", raw.kind, Value::Object(raw.payload.clone()))
            }
            other => f.write_str(other.kind_name()),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
