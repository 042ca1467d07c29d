//! Correction specs
//!
//! `fix` and `verify` against logs whose snapshots disagree with replay.

use crate::prelude::*;

/// A log whose latest snapshot was written by different rules
fn stale_snapshot_project() -> Project {
    let temp = Project::empty();
    temp.seed(&[
        record("A", 1, Event::OpenAccount, AggregateState::open(0)),
        record("A", 2, Event::deposit(50), AggregateState::open(51)),
        record("A", 3, Event::deposit(20), AggregateState::open(72)),
    ]);
    temp
}

#[test]
fn fix_on_missing_account_is_a_noop() {
    let temp = Project::empty();
    temp.tally()
        .args(&["fix", "ghost"])
        .passes()
        .stdout_eq("ghost: no records, nothing to fix\n");
    temp.tally().args(&["list"]).passes().stdout_eq("No records\n");
}

#[test]
fn fix_on_consistent_account_appends_nothing() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();
    temp.tally().args(&["deposit", "A", "5"]).passes();

    temp.tally()
        .args(&["fix", "A"])
        .passes()
        .stdout_eq("A: consistent at {balance: 5}, nothing appended\n");
    assert_eq!(temp.read(DATA_FILE).lines().count(), 2);
}

#[test]
fn fix_appends_corrected_snapshot_once() {
    let temp = stale_snapshot_project();
    let before = temp.read(DATA_FILE);

    temp.tally()
        .args(&["fix", "A"])
        .passes()
        .stdout_eq("A: appended fix #4 -> {balance: 70}\n");

    // Earlier lines are untouched
    let after = temp.read(DATA_FILE);
    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 4);

    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq("{balance: 70}\n");
    temp.tally()
        .args(&["fix", "A"])
        .passes()
        .stdout_has("nothing appended");
    assert_eq!(temp.read(DATA_FILE).lines().count(), 4);
}

#[test]
fn verify_reports_divergent_snapshots() {
    let temp = stale_snapshot_project();

    temp.tally().args(&["verify", "A"]).passes().stdout_eq(
        "A: 2 divergent snapshot(s)\n  \
         #2    stored {balance: 51}, recomputed {balance: 50}\n  \
         #3    stored {balance: 72}, recomputed {balance: 70}\n",
    );

    let json = temp
        .tally()
        .args(&["--format", "json", "verify", "A"])
        .passes()
        .json();
    assert_eq!(json["account"], "A");
    assert_eq!(json["divergent"][0]["sequenceNo"], 2);
    assert_eq!(json["divergent"][0]["recomputed"]["balance"], 50);
}

#[test]
fn verify_on_clean_account_reports_match() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();
    temp.tally()
        .args(&["verify", "A"])
        .passes()
        .stdout_eq("A: all snapshots match\n");
}

#[test]
fn unknown_event_kind_blocks_replay() {
    let temp = Project::empty();
    temp.seed(&[
        record("A", 1, Event::OpenAccount, AggregateState::open(0)),
        record(
            "A",
            2,
            Event::from(RawEvent::new("withdraw").with_field("amount", 5)),
            AggregateState::open(0),
        ),
    ]);

    temp.tally()
        .args(&["deposit", "A", "1"])
        .exits_with(5)
        .stderr_has("unknown event kind 'withdraw'");
    temp.tally().args(&["fix", "A"]).exits_with(5);
    temp.tally().args(&["summary"]).exits_with(5);

    // The record is still listed verbatim
    let run = temp.tally().args(&["--format", "json", "history", "A"]).passes();
    assert_eq!(run.json()[1]["event"]["kind"], "withdraw");
    assert_eq!(run.json()[1]["event"]["payload"]["amount"], 5);
}
