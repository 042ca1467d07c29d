// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally-core: domain model for the tally event log
//!
//! This crate provides:
//! - The closed set of account events and their persisted shape
//! - Aggregate state and the records that snapshot it
//! - The pure projector that folds events into state
//! - Configuration loading

pub mod config;
pub mod event;
pub mod projector;
pub mod record;
pub mod state;

pub use config::{Config, ConfigError, ReopenPolicy};
pub use event::{Event, EventKind, RawEvent};
pub use projector::{AccountProjector, ProjectionError, Projector};
pub use record::Record;
pub use state::{Account, AggregateState};
