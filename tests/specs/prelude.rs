//! Shared helpers for tally specs
//!
//! Each spec runs the real binary inside its own scratch directory, so the
//! default `tally.jsonl` and `tally.toml` never leak between tests.

#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tally_core::Record;
use tally_storage::{Backend, FileBackend};

pub use tally_core::{AggregateState, Event, RawEvent};

pub const DATA_FILE: &str = "tally.jsonl";

/// Scratch working directory for one spec
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.path().join(DATA_FILE)
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).unwrap()
    }

    /// Append raw bytes to the data file, bypassing tally
    pub fn append_raw(&self, text: &str) {
        use std::io::Write;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.data_path())
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    /// Store records in the default data file exactly as given, with no
    /// validation of sequence numbers or snapshots
    pub fn seed(&self, records: &[Record]) {
        let mut backend = FileBackend::open(&self.data_path()).unwrap();
        backend.poll().unwrap();
        for record in records {
            backend.append(record).unwrap();
        }
    }

    /// `tally` running in this project with a clean environment
    pub fn tally(&self) -> Cli {
        let mut cmd = Command::cargo_bin("tally").unwrap();
        cmd.current_dir(self.path())
            .env_remove("TALLY_DATA")
            .env_remove("RUST_LOG");
        Cli { cmd }
    }
}

/// Path of the built binary, for specs that spawn processes themselves
pub fn tally_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("tally")
}

pub fn record(id: &str, seq: u64, event: Event, state: AggregateState) -> Record {
    Record::new(id, seq, event, state)
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        Run {
            output: self.cmd.output().unwrap(),
        }
    }

    /// Run and require exit status 0
    pub fn passes(self) -> Run {
        let run = self.run();
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status.code(),
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require a specific exit status
    pub fn exits_with(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            predicate::str::contains(expected).eval(&stdout),
            "stdout does not contain {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            predicate::str::contains(expected).eval(&stderr),
            "stderr does not contain {:?}:\n{}",
            expected,
            stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }
}
