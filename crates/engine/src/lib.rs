// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally-engine: reading, appending and correcting account streams
//!
//! Every write goes through the [`WriteCoordinator`]. It serializes appends
//! per aggregate, folds the prior events, and commits the result with an
//! optimistic sequence check.

mod coordinator;
mod correction;
mod error;
mod ledger;
mod resolver;

pub use coordinator::{Decision, History, WriteCoordinator};
pub use correction::{CorrectionHandler, Divergence, FixOutcome};
pub use error::{ErrorKind, LedgerError};
pub use ledger::{Ledger, Summary};
pub use resolver::{check_contiguous, Resolver};
