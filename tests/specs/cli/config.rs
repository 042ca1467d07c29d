//! Configuration specs
//!
//! tally.toml discovery, --config and overrides.

use crate::prelude::*;

#[test]
fn config_data_path_is_relative_to_config_file() {
    let temp = Project::empty();
    temp.file("conf/tally.toml", "data_path = \"ledger.jsonl\"\n");

    temp.tally()
        .args(&["--config", "conf/tally.toml", "open", "A"])
        .passes();
    assert!(temp.path().join("conf/ledger.jsonl").is_file());
    assert!(!temp.data_path().exists());
}

#[test]
fn default_config_is_discovered() {
    let temp = Project::empty();
    temp.file("tally.toml", "data_path = \"other.jsonl\"\n");

    temp.tally().args(&["open", "A"]).passes();
    assert!(temp.path().join("other.jsonl").is_file());
}

#[test]
fn data_flag_overrides_config() {
    let temp = Project::empty();
    temp.file("tally.toml", "data_path = \"other.jsonl\"\n");

    temp.tally()
        .args(&["--data", "flag.jsonl", "open", "A"])
        .passes();
    assert!(temp.path().join("flag.jsonl").is_file());
    assert!(!temp.path().join("other.jsonl").exists());
}

#[test]
fn missing_explicit_config_exits_with_one() {
    let temp = Project::empty();
    temp.tally()
        .args(&["--config", "nope.toml", "list"])
        .exits_with(1)
        .stderr_has("cannot read config");
}

#[test]
fn unknown_config_key_exits_with_one() {
    let temp = Project::empty();
    temp.file("tally.toml", "colour = \"blue\"\n");

    temp.tally()
        .args(&["list"])
        .exits_with(1)
        .stderr_has("invalid config");
}

#[test]
fn zero_append_attempts_is_rejected() {
    let temp = Project::empty();
    temp.file("tally.toml", "max_append_attempts = 0\n");

    temp.tally()
        .args(&["list"])
        .exits_with(1)
        .stderr_has("max_append_attempts must be at least 1");
}
