//! Trace records and sinks for instrumented operations.
//!
//! This module provides the types that carry observations out of wrapped
//! operations. A wrapper emits [`TraceRecord`]s around each dispatch; where
//! they land is decided by the [`TraceSink`] installed on the
//! [`Interceptor`](crate::Interceptor).
//!
//! # Architecture
//!
//! Sinks are deliberately dumb: a wrapper produces records synchronously on
//! the dispatching thread, and the sink only stores or forwards them.
//!
//! - [`LogSink`] - Forwards records to the `tracing` subscriber (the default)
//! - [`MemorySink`] - Collects records in memory for inspection, mainly in tests
//!
//! The [`MemorySink`] container uses `boxcar::Vec` for thread-safe, lock-free
//! append operations, allowing records to be collected from parallel dispatch
//! without synchronization overhead.
//!
//! # Key Components
//!
//! - [`TraceOptions`] - Selects which extra observations a wrapper emits
//! - [`TraceRecord`] - Individual observation with target and context
//! - [`TraceRecordKind`] - What was observed (entry, exit, stack, ...)
//! - [`TraceSink`] - Destination trait for records
//!
//! # Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::trace::{MemorySink, TraceRecord, TraceRecordKind, TraceSink};
//!
//! let sink = Arc::new(MemorySink::new());
//!
//! sink.record(TraceRecord::new("Logger::flush", TraceRecordKind::Enter));
//! sink.record(TraceRecord::new("Logger::flush", TraceRecordKind::Exit));
//!
//! assert_eq!(sink.count(), 2);
//! for record in sink.iter() {
//!     println!("{}", record);
//! }
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`]. Records arrive from
//! whichever thread dispatched the wrapped call; both provided sinks accept
//! them without coordination.

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;

use crate::runtime::InstanceId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Selects the extra observations a tracing wrapper emits.
    ///
    /// Entry and exit records are always produced; these flags add
    /// progressively heavier context around them.
    pub struct TraceOptions: u8 {
        /// Capture a backtrace of the dispatching thread on entry
        const STACK_TRACE = 1 << 0;
        /// Record the receiver's [`dump`](crate::runtime::Receiver::dump) output on entry
        const DUMP_RECEIVER = 1 << 1;
        /// Measure wall-clock time spent in the operation
        const EXECUTION_TIME = 1 << 2;
        /// Everything at once
        const ALL = Self::STACK_TRACE.bits()
            | Self::DUMP_RECEIVER.bits()
            | Self::EXECUTION_TIME.bits();
    }
}

/// What a single trace record observed.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecordKind {
    /// Dispatch entered the operation
    Enter,
    /// Dispatch left the operation
    Exit,
    /// Backtrace of the dispatching thread, captured on entry
    Stack(String),
    /// The receiver's rendered state, captured on entry
    Receiver(String),
    /// Wall-clock time the operation body consumed
    Elapsed(Duration),
}

/// A single observation emitted by a tracing wrapper.
///
/// Records carry the hook target in `Type::operation` form and optionally
/// the identity of the receiver that triggered them.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    /// The hooked target in `Type::operation` form
    pub target: String,

    /// What was observed
    pub kind: TraceRecordKind,

    /// Identity of the dispatching receiver, when known
    pub instance: Option<InstanceId>,
}

impl TraceRecord {
    /// Creates a new trace record.
    ///
    /// # Arguments
    ///
    /// * `target` - The hooked target in `Type::operation` form
    /// * `kind` - What was observed
    pub fn new(target: impl Into<String>, kind: TraceRecordKind) -> Self {
        Self {
            target: target.into(),
            kind,
            instance: None,
        }
    }

    /// Adds the dispatching receiver's identity to the record.
    #[must_use]
    pub fn with_instance(mut self, instance: InstanceId) -> Self {
        self.instance = Some(instance);
        self
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TraceRecordKind::Enter => write!(f, "enter {}", self.target)?,
            TraceRecordKind::Exit => write!(f, "exit {}", self.target)?,
            TraceRecordKind::Elapsed(duration) => {
                write!(f, "elapsed {}: {:?}", self.target, duration)?;
            }
            TraceRecordKind::Receiver(dump) => write!(f, "receiver {}: {}", self.target, dump)?,
            TraceRecordKind::Stack(trace) => write!(f, "stack {}:\n{}", self.target, trace)?,
        }

        if let Some(instance) = self.instance {
            write!(f, " (instance: {})", instance)?;
        }

        Ok(())
    }
}

/// Destination for trace records.
///
/// Implementations receive records synchronously on the thread that
/// dispatched the wrapped call, so they should return quickly and must
/// not dispatch back into the hooked operation.
pub trait TraceSink: Send + Sync {
    /// Accept one record
    fn record(&self, record: TraceRecord);
}

/// Sink that forwards every record to the `tracing` subscriber.
///
/// Entry, exit, and timing records are emitted at `INFO`; stack and
/// receiver dumps, which can be large, at `DEBUG`.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// Creates a new log sink.
    #[must_use]
    pub fn new() -> Self {
        LogSink
    }
}

impl TraceSink for LogSink {
    fn record(&self, record: TraceRecord) {
        match record.kind {
            TraceRecordKind::Stack(_) | TraceRecordKind::Receiver(_) => {
                tracing::debug!(target: "interpose::trace", "{}", record);
            }
            _ => {
                tracing::info!(target: "interpose::trace", "{}", record);
            }
        }
    }
}

/// Thread-safe sink that collects records in memory.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append
/// operations. Multiple threads can safely record simultaneously.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::trace::{MemorySink, TraceRecord, TraceRecordKind, TraceSink};
///
/// let sink = Arc::new(MemorySink::new());
///
/// // Can be cloned and shared across threads
/// let sink_clone = Arc::clone(&sink);
/// std::thread::spawn(move || {
///     sink_clone.record(TraceRecord::new("Worker::run", TraceRecordKind::Enter));
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(sink.count(), 1);
/// ```
#[derive(Debug)]
pub struct MemorySink {
    entries: boxcar::Vec<TraceRecord>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Creates a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Returns true if any records have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns the total number of records.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns an iterator over all records in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Returns records filtered by target.
    pub fn by_target(&self, target: &str) -> Vec<&TraceRecord> {
        self.entries
            .iter()
            .filter(|(_, r)| r.target == target)
            .map(|(_, r)| r)
            .collect()
    }

    /// Returns the number of records matching a kind predicate.
    pub fn count_matching(&self, predicate: impl Fn(&TraceRecordKind) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|(_, r)| predicate(&r.kind))
            .count()
    }
}

impl TraceSink for MemorySink {
    fn record(&self, record: TraceRecord) {
        self.entries.push(record);
    }
}
