//! # Sinks
//!
//! The only externally observable effects of a refresh pass.
//!
//! The engine treats both sinks as fire-and-forget: a returned `SinkError`
//! is logged and dropped, and never stops transition bookkeeping.
//!
//! ## Implementations
//!
//! - `MemoryReportSink` / `MemoryLogSink`: bounded in-memory buffers
//! - `TracingLogSink`: one structured `tracing` event per record
//! - `NullSink`: discards everything

use crate::primitives::DEFAULT_RETAINED_EVENTS;
use crate::{LogRecord, ReportEvent};
use std::collections::VecDeque;
use thiserror::Error;

/// A sink could not accept an event.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The backend rejected or failed to deliver the event.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The event could not be encoded for the backend.
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

// =============================================================================
// SINK TRAITS
// =============================================================================

/// Receives failure reports (the crash-reporting side).
pub trait ReportSink {
    /// Deliver one failure event.
    fn report(&mut self, event: &ReportEvent) -> Result<(), SinkError>;
}

/// Receives operational log records.
pub trait LogSink {
    /// Deliver one log record.
    fn log(&mut self, record: &LogRecord) -> Result<(), SinkError>;
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    fn report(&mut self, event: &ReportEvent) -> Result<(), SinkError> {
        (**self).report(event)
    }
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn log(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).log(record)
    }
}

impl<T: ReportSink + ?Sized> ReportSink for Box<T> {
    fn report(&mut self, event: &ReportEvent) -> Result<(), SinkError> {
        (**self).report(event)
    }
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn log(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).log(record)
    }
}

// =============================================================================
// IN-MEMORY SINKS
// =============================================================================

/// Fixed-capacity buffer that drops the oldest entry when full.
#[derive(Debug, Clone)]
struct Retained<T> {
    items: VecDeque<T>,
    capacity: usize,
    total: u64,
}

impl<T: Clone> Retained<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    fn push(&mut self, item: &T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item.clone());
        self.total = self.total.saturating_add(1);
    }
}

/// Report sink that keeps the most recent events in memory.
#[derive(Debug, Clone)]
pub struct MemoryReportSink {
    events: Retained<ReportEvent>,
}

impl Default for MemoryReportSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_EVENTS)
    }
}

impl MemoryReportSink {
    /// Create a sink with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that retains at most `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Retained::with_capacity(capacity),
        }
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &ReportEvent> {
        self.events.items.iter()
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.items.len()
    }

    /// Check if no events are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.items.is_empty()
    }

    /// Number of events ever received, including dropped ones.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.events.total
    }
}

impl ReportSink for MemoryReportSink {
    fn report(&mut self, event: &ReportEvent) -> Result<(), SinkError> {
        self.events.push(event);
        Ok(())
    }
}

/// Log sink that keeps the most recent records in memory.
#[derive(Debug, Clone)]
pub struct MemoryLogSink {
    records: Retained<LogRecord>,
}

impl Default for MemoryLogSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_EVENTS)
    }
}

impl MemoryLogSink {
    /// Create a sink with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that retains at most `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Retained::with_capacity(capacity),
        }
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.items.iter()
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.items.len()
    }

    /// Check if no records are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.items.is_empty()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }
}

// =============================================================================
// TRACING SINK
// =============================================================================

/// Log sink that emits each record as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        let fields = serde_json::to_string(&record.fields)
            .map_err(|e| SinkError::Encoding(e.to_string()))?;
        tracing::error!(
            resource = %record.resource,
            fields = %fields,
            "{}",
            record.message
        );
        Ok(())
    }
}

// =============================================================================
// NULL SINK
// =============================================================================

/// Sink that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn report(&mut self, _event: &ReportEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

impl LogSink for NullSink {
    fn log(&mut self, _record: &LogRecord) -> Result<(), SinkError> {
        Ok(())
    }
}
