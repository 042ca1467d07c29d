// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally-storage: durable, append-only record log
//!
//! ## Architecture
//!
//! ```text
//! Record → LogEntry → Backend::append → disk (tally.jsonl)
//!                                          ↓
//!                           Backend::poll → EventLog index → list()
//! ```
//!
//! ## Durability Guarantees
//!
//! - One record is one checksummed line, fsync'd before `append` returns
//! - Records become visible in-process only after the durable write
//! - A trailing line without its newline is invisible to readers and removed
//!   by the next writer
//! - Any complete line that fails to decode or verify is corruption

pub mod backend;
pub mod entry;
pub mod error;
pub mod file;
pub mod log;

pub use backend::{Backend, MemoryBackend};
pub use entry::LogEntry;
pub use error::StoreError;
pub use file::FileBackend;
pub use log::EventLog;
