//! # Report Log
//!
//! The production report sink: every failure report is stamped, appended to
//! a JSON lines file when one is configured, and kept in a bounded in-memory
//! buffer served by `GET /reports`.

use chrono::{SecondsFormat, Utc};
use migration_monitor_core::{MonitorError, ReportEvent, ReportSink, SinkError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A delivered report with its delivery time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// RFC 3339 UTC time the report was received.
    pub reported_at: String,
    #[serde(flatten)]
    pub event: ReportEvent,
}

/// Report sink backed by an optional JSON lines file.
#[derive(Debug)]
pub struct ReportLog {
    file: Option<(PathBuf, File)>,
    retained: VecDeque<ReportEntry>,
    capacity: usize,
    total: u64,
}

impl ReportLog {
    /// Keep reports in memory only.
    #[must_use]
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            file: None,
            retained: VecDeque::new(),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    /// Append reports to `path`, creating it if needed.
    pub fn with_file(path: &Path, capacity: usize) -> Result<Self, MonitorError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                MonitorError::IoError(format!("Cannot open report log '{}': {}", path.display(), e))
            })?;
        Ok(Self {
            file: Some((path.to_path_buf(), file)),
            ..Self::in_memory(capacity)
        })
    }

    /// Open the file if `path` is set, otherwise keep reports in memory.
    pub fn open(path: Option<&Path>, capacity: usize) -> Result<Self, MonitorError> {
        match path {
            Some(path) => Self::with_file(path, capacity),
            None => Ok(Self::in_memory(capacity)),
        }
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }

    /// Up to `limit` most recent entries, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<ReportEntry> {
        let skip = self.retained.len().saturating_sub(limit);
        self.retained.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    /// Check if no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Number of reports delivered since start.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl ReportSink for ReportLog {
    fn report(&mut self, event: &ReportEvent) -> Result<(), SinkError> {
        let entry = ReportEntry {
            reported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event: event.clone(),
        };

        // Only delivered entries are retained and counted.
        if let Some((_, file)) = self.file.as_mut() {
            let mut line =
                serde_json::to_vec(&entry).map_err(|e| SinkError::Encoding(e.to_string()))?;
            line.push(b'\n');
            file.write_all(&line)
                .and_then(|()| file.flush())
                .map_err(|e| SinkError::Delivery(e.to_string()))?;
        }

        if self.retained.len() == self.capacity {
            self.retained.pop_front();
        }
        self.retained.push_back(entry);
        self.total = self.total.saturating_add(1);
        Ok(())
    }
}
