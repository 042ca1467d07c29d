//! CLI usage specs
//!
//! Help text, usage errors and error formatting.

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    let run = temp.tally().args(&["--help"]).passes();
    for command in ["open", "deposit", "close", "state", "history", "fix", "verify", "list", "summary"] {
        assert!(run.stdout().contains(command), "missing {}", command);
    }
}

#[test]
fn version_is_printed() {
    let temp = Project::empty();
    temp.tally().args(&["--version"]).passes().stdout_has("tally");
}

#[test]
fn unknown_command_is_a_usage_error() {
    let temp = Project::empty();
    temp.tally().args(&["withdraw", "A", "5"]).exits_with(2);
}

#[test]
fn non_integer_amount_is_a_usage_error() {
    let temp = Project::empty();
    temp.tally()
        .args(&["deposit", "A", "12.5"])
        .exits_with(2)
        .stderr_has("invalid value");
    assert!(!temp.data_path().exists());
}

#[test]
fn errors_carry_suggestions() {
    let temp = Project::empty();
    temp.tally()
        .args(&["deposit", "A", "10"])
        .exits_with(3)
        .stderr_has("suggestions:")
        .stderr_has("tally history <account>");
}

#[test]
fn stdout_stays_empty_on_failure() {
    let temp = Project::empty();
    temp.tally()
        .args(&["close", "A"])
        .exits_with(3)
        .stdout_eq("");
}
