// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with context, suggestions and an exit code

use std::fmt;
use tally_core::ConfigError;
use tally_engine::{ErrorKind, LedgerError};

/// Exit code for configuration and other unclassified failures
pub const EXIT_FAILURE: u8 = 1;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct TallyError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub exit_code: u8,
}

impl TallyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            exit_code: EXIT_FAILURE,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_exit_code(mut self, code: u8) -> Self {
        self.exit_code = code;
        self
    }

    fn from_ledger(err: &LedgerError) -> Self {
        let kind = err.kind();
        let base = TallyError::new(err.to_string()).with_exit_code(exit_code(kind));
        match kind {
            ErrorKind::InvalidSequence => base
                .with_context("the event does not fit the account's current state")
                .with_suggestion("inspect the account: tally history <account>"),
            ErrorKind::InvalidEvent => {
                base.with_suggestion("deposits must be non-negative and fit the balance")
            }
            ErrorKind::UnknownEvent => base
                .with_context("the log holds an event kind this build does not know")
                .with_suggestion("run a tally build that understands the newer events"),
            ErrorKind::StoreUnavailable => base.with_suggestion(
                "check that --data (or TALLY_DATA) names a readable, writable file",
            ),
            ErrorKind::CorruptStore => base
                .with_context("the data file was edited by hand or damaged on disk")
                .with_suggestion("inspect the reported line of the data file"),
            ErrorKind::ConcurrencyConflict => base
                .with_context("other writers kept appending to the same account")
                .with_suggestion("retry the command")
                .with_suggestion("raise max_append_attempts in tally.toml"),
        }
    }

    fn from_config(err: &ConfigError) -> Self {
        TallyError::new(err.to_string())
            .with_suggestion("valid keys are data_path, max_append_attempts and reopen")
    }
}

/// Exit status for each class of ledger failure
pub fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidSequence => 3,
        ErrorKind::InvalidEvent => 4,
        ErrorKind::UnknownEvent => 5,
        ErrorKind::StoreUnavailable => 6,
        ErrorKind::CorruptStore => 7,
        ErrorKind::ConcurrencyConflict => 8,
    }
}

impl From<anyhow::Error> for TallyError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(ledger) = err.downcast_ref::<LedgerError>() {
            return Self::from_ledger(ledger);
        }
        if let Some(config) = err.downcast_ref::<ConfigError>() {
            return Self::from_config(config);
        }
        err.chain()
            .skip(1)
            .fold(TallyError::new(err.to_string()), |e, cause| {
                e.with_context(cause.to_string())
            })
    }
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for TallyError {}
