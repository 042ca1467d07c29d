// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines file backend
//!
//! Appends take an exclusive `flock` on the file, check that nothing was
//! written since this handle last read it, write one line and fsync. Readers
//! take no lock: a trailing line without a newline is an append in flight (or
//! torn by a crash) and is not consumed. A complete line that fails to decode
//! or verify is corruption wherever it sits.

use crate::backend::Backend;
use crate::entry::LogEntry;
use crate::error::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tally_core::Record;

/// File-backed record sequence
pub struct FileBackend {
    path: PathBuf,
    file: File,
    /// Byte offset just past the last entry consumed
    offset: u64,
    /// Lines consumed so far, for diagnostics
    line: u64,
    /// Position the next entry must carry
    next_position: u64,
}

/// Result of scanning the unread part of the file
struct Tail {
    entries: Vec<LogEntry>,
    /// Offset just past the last valid entry (or blank line)
    end: u64,
    lines: u64,
    /// Unconsumed bytes after `end`: line number and reason
    torn: Option<(u64, String)>,
}

impl FileBackend {
    /// Open the log at `path`, creating it (and its directory) if missing
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(path, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::unavailable(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            offset: 0,
            line: 0,
            next_position: 0,
        })
    }

    fn io(&self, e: std::io::Error) -> StoreError {
        StoreError::unavailable(&self.path, e)
    }

    fn corrupt(&self, line: u64, reason: impl std::fmt::Display) -> StoreError {
        StoreError::corrupt(format!("{}: line {}: {}", self.path.display(), line, reason))
    }

    /// Read entries after `self.offset` without consuming them
    fn scan(&self) -> Result<Tail, StoreError> {
        let mut handle = &self.file;
        handle
            .seek(SeekFrom::Start(self.offset))
            .map_err(|e| self.io(e))?;
        let mut reader = BufReader::new(handle);

        let mut tail = Tail {
            entries: Vec::new(),
            end: self.offset,
            lines: 0,
            torn: None,
        };
        let mut position = self.next_position;
        let mut cursor = self.offset;
        let mut buf = String::new();

        loop {
            buf.clear();
            let read = reader.read_line(&mut buf).map_err(|e| self.io(e))?;
            if read == 0 {
                break;
            }
            cursor += read as u64;
            let line_number = self.line + tail.lines + 1;

            // Every entry is written with its newline in one call, so only a
            // line still missing it can be an append in flight
            if !buf.ends_with('\n') {
                tail.torn = Some((line_number, "incomplete line".to_string()));
                break;
            }

            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                let entry = LogEntry::from_line(trimmed)
                    .map_err(|e| self.corrupt(line_number, e))?;
                if !entry.verify() {
                    return Err(self.corrupt(line_number, "checksum mismatch"));
                }
                if entry.position != position {
                    return Err(self.corrupt(
                        line_number,
                        format!("expected position {}, found {}", position, entry.position),
                    ));
                }
                position += 1;
                tail.entries.push(entry);
            }
            tail.end = cursor;
            tail.lines += 1;
        }

        Ok(tail)
    }

    /// Scan without holding the lock
    ///
    /// A writer may cut a torn tail and append while this handle is midway
    /// through reading it, splicing two lines together. Corruption is only
    /// reported if a second scan still finds it.
    fn scan_unlocked(&self) -> Result<Tail, StoreError> {
        match self.scan() {
            Err(StoreError::Corrupt { detail }) => {
                tracing::debug!(path = %self.path.display(), %detail, "rescanning after corrupt read");
                self.scan()
            }
            other => other,
        }
    }

    fn consume(&mut self, tail: &Tail) {
        self.offset = tail.end;
        self.line += tail.lines;
        self.next_position += tail.entries.len() as u64;
    }

    /// Cut a torn tail left behind by a crashed writer. Caller holds the lock.
    fn repair(&mut self, tail: &Tail) -> Result<(), StoreError> {
        if let Some((line, reason)) = &tail.torn {
            tracing::warn!(
                path = %self.path.display(),
                line,
                %reason,
                offset = tail.end,
                "truncating torn log tail"
            );
        }
        self.file.set_len(tail.end).map_err(|e| self.io(e))?;
        self.file.sync_all().map_err(|e| self.io(e))?;
        self.consume(tail);
        Ok(())
    }
}

impl Backend for FileBackend {
    fn poll(&mut self) -> Result<Vec<Record>, StoreError> {
        let tail = self.scan_unlocked()?;
        if let Some((line, reason)) = &tail.torn {
            tracing::debug!(path = %self.path.display(), line, %reason, "stopping before unreadable tail");
        }
        self.consume(&tail);
        Ok(tail.entries.into_iter().map(|e| e.record).collect())
    }

    fn append(&mut self, record: &Record) -> Result<(), StoreError> {
        let _lock = FileLock::exclusive(&self.file, &self.path)?;

        let len = self.file.metadata().map_err(|e| self.io(e))?.len();
        if len != self.offset {
            let tail = self.scan()?;
            if !tail.entries.is_empty() {
                return Err(StoreError::Stale);
            }
            self.repair(&tail)?;
        }

        let entry = LogEntry::new(self.next_position, record.clone())?;
        let mut line = entry.to_line()?;
        line.push('\n');

        // One write per entry; a crash mid-write leaves a torn tail, never a
        // half-entry followed by more data.
        self.file
            .write_all(line.as_bytes())
            .map_err(|e| self.io(e))?;
        self.file.sync_all().map_err(|e| self.io(e))?;

        self.offset += line.len() as u64;
        self.line += 1;
        self.next_position += 1;
        Ok(())
    }
}

/// Exclusive advisory lock, released on drop
///
/// Holds a duplicate of the log handle; a duplicate shares the open file
/// description, so it owns the same `flock`.
struct FileLock {
    file: File,
}

impl FileLock {
    fn exclusive(file: &File, path: &Path) -> Result<Self, StoreError> {
        let file = file
            .try_clone()
            .map_err(|e| StoreError::unavailable(path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| StoreError::unavailable(path, e))?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release log lock");
        }
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
