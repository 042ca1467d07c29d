//! Account lifecycle specs
//!
//! Open, deposit and close through the CLI and read state back.

use crate::prelude::*;

#[test]
fn open_then_deposits_accumulate() {
    let temp = Project::empty();

    temp.tally()
        .args(&["open", "A"])
        .passes()
        .stdout_eq("A #1 open_account -> {balance: 0}\n");
    temp.tally()
        .args(&["deposit", "A", "50"])
        .passes()
        .stdout_eq("A #2 deposit 50 -> {balance: 50}\n");
    temp.tally().args(&["deposit", "A", "20"]).passes();

    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq("{balance: 70}\n");
}

#[test]
fn data_file_is_created_in_working_directory() {
    let temp = Project::empty();
    assert!(!temp.data_path().exists());

    temp.tally().args(&["open", "A"]).passes();

    let contents = temp.read(DATA_FILE);
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.ends_with('\n'));
}

#[test]
fn state_of_unknown_account_is_none() {
    let temp = Project::empty();
    temp.tally().args(&["state", "ghost"]).passes().stdout_eq("none\n");

    let run = temp.tally().args(&["--format", "json", "state", "ghost"]).passes();
    assert_eq!(run.json(), serde_json::Value::Null);
}

#[test]
fn deposit_without_open_exits_with_invalid_sequence() {
    let temp = Project::empty();

    temp.tally()
        .args(&["deposit", "A", "10"])
        .exits_with(3)
        .stderr_has("error: deposit cannot be applied to none");

    temp.tally().args(&["list"]).passes().stdout_eq("No records\n");
}

#[test]
fn negative_deposit_exits_with_invalid_event() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();

    temp.tally()
        .args(&["deposit", "A", "-5"])
        .exits_with(4)
        .stderr_has("invalid deposit event");

    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq("{balance: 0}\n");
}

#[test]
fn closed_account_refuses_deposits() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();
    temp.tally().args(&["deposit", "A", "9"]).passes();
    temp.tally()
        .args(&["close", "A"])
        .passes()
        .stdout_eq("A #3 close_account -> {balance: 9, closed}\n");

    temp.tally().args(&["deposit", "A", "1"]).exits_with(3);
    temp.tally().args(&["close", "A"]).exits_with(3);
}

#[test]
fn reopen_resets_balance() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();
    temp.tally().args(&["deposit", "A", "40"]).passes();
    temp.tally().args(&["open", "A"]).passes();

    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq("{balance: 0}\n");
}

#[test]
fn reopen_can_be_rejected_by_config() {
    let temp = Project::empty();
    temp.file("tally.toml", "reopen = \"reject\"\n");
    temp.tally().args(&["open", "A"]).passes();
    temp.tally().args(&["deposit", "A", "40"]).passes();

    temp.tally()
        .args(&["open", "A"])
        .exits_with(3)
        .stderr_has("already open");
    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq("{balance: 40}\n");
}

#[test]
fn json_output_for_appends() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();

    let run = temp
        .tally()
        .args(&["--format", "json", "deposit", "A", "50"])
        .passes();
    let json = run.json();
    assert_eq!(json["aggregateId"], "A");
    assert_eq!(json["sequenceNo"], 2);
    assert_eq!(json["event"]["kind"], "deposit");
    assert_eq!(json["event"]["payload"]["amount"], 50);
    assert_eq!(json["stateSnapshot"]["balance"], 50);
}
