//! Concurrent writer specs
//!
//! Separate tally processes appending to one data file.

use crate::prelude::*;
use std::process::{Command, Stdio};

const WRITERS: usize = 8;

#[test]
fn parallel_processes_lose_no_deposits() {
    let temp = Project::empty();
    temp.tally().args(&["open", "A"]).passes();

    let children: Vec<_> = (0..WRITERS)
        .map(|_| {
            Command::new(tally_bin())
                .current_dir(temp.path())
                .env_remove("TALLY_DATA")
                .env_remove("RUST_LOG")
                .args(["deposit", "A", "1"])
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .unwrap()
        })
        .collect();

    for child in children {
        let output = child.wait_with_output().unwrap();
        assert!(
            output.status.success(),
            "writer failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    temp.tally()
        .args(&["state", "A"])
        .passes()
        .stdout_eq(&format!("{{balance: {}}}\n", WRITERS));

    let history = temp
        .tally()
        .args(&["--format", "json", "history", "A"])
        .passes()
        .json();
    let sequence: Vec<u64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["sequenceNo"].as_u64().unwrap())
        .collect();
    assert_eq!(sequence, (1..=WRITERS as u64 + 1).collect::<Vec<_>>());
}

#[test]
fn parallel_processes_on_different_accounts() {
    let temp = Project::empty();
    let ids: Vec<String> = (0..WRITERS).map(|i| format!("acct-{}", i)).collect();

    let children: Vec<_> = ids
        .iter()
        .map(|id| {
            Command::new(tally_bin())
                .current_dir(temp.path())
                .env_remove("TALLY_DATA")
                .args(["open", id.as_str()])
                .stdout(Stdio::null())
                .spawn()
                .unwrap()
        })
        .collect();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    temp.tally()
        .args(&["summary"])
        .passes()
        .stdout_has(&format!("accounts: {} ({} open, 0 closed)", WRITERS, WRITERS));
}
