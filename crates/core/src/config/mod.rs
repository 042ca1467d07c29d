// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration modules

mod settings;

pub use settings::{
    Config, ConfigError, ReopenPolicy, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE,
    DEFAULT_MAX_APPEND_ATTEMPTS,
};
