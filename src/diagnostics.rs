//! Append-only diagnostics log for skipped gestures.
//!
//! Exactly one thread owns the log file. Workers hold a [`ChannelSink`] and
//! enqueue entries; the writer thread drains the channel in arrival order
//! and writes one CSV row per entry.

use crate::core::{DiagnosticEntry, Error, Result};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread::JoinHandle;

const HEADER: &str = "gesture_id,reason,detail,app,trace";

/// Destination for diagnostics entries. Shared by every worker of a run.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, entry: DiagnosticEntry);
}

/// Sender half handed to workers.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<DiagnosticEntry>,
}

impl DiagnosticsSink for ChannelSink {
    fn record(&self, entry: DiagnosticEntry) {
        tracing::debug!(
            gesture = %entry.gesture_id,
            reason = %entry.reason,
            app = %entry.app,
            trace = %entry.trace,
            "{}",
            entry.detail
        );
        // The receiver only disappears once the log is finished, after all
        // workers are done.
        let _ = self.sender.send(entry);
    }
}

/// Owner of the writer thread.
pub struct DiagnosticsLog {
    sink: ChannelSink,
    handle: JoinHandle<std::io::Result<usize>>,
}

impl DiagnosticsLog {
    /// Creates (truncating) the CSV log at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::io_at(path, e))?;
        Self::to_writer(BufWriter::new(file))
    }

    /// Spawns the writer thread over an arbitrary destination.
    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Result<Self> {
        let (sender, receiver) = channel::unbounded();
        let handle = std::thread::Builder::new()
            .name("diagnostics-writer".into())
            .spawn(move || drain(writer, receiver))?;
        Ok(Self {
            sink: ChannelSink { sender },
            handle,
        })
    }

    pub fn sink(&self) -> ChannelSink {
        self.sink.clone()
    }

    /// Closes the channel, waits for the writer, and returns the number of
    /// rows written. Every sink clone must be dropped first.
    pub fn finish(self) -> Result<usize> {
        let Self { sink, handle } = self;
        drop(sink);
        handle
            .join()
            .map_err(|_| Error::Concurrency("diagnostics writer panicked".into()))?
            .map_err(Error::Io)
    }
}

fn drain<W: Write>(mut writer: W, receiver: Receiver<DiagnosticEntry>) -> std::io::Result<usize> {
    writeln!(writer, "{HEADER}")?;
    let mut rows = 0;
    for entry in receiver {
        writeln!(writer, "{}", csv_row(&entry))?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

fn csv_row(entry: &DiagnosticEntry) -> String {
    [
        entry.gesture_id.as_str(),
        entry.reason.as_str(),
        entry.detail.as_str(),
        entry.app.as_str(),
        entry.trace.as_str(),
    ]
    .iter()
    .map(|field| csv_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Collects entries in memory; used by tests and library callers that do
/// not want a file.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, entry: DiagnosticEntry) {
        self.entries.lock().push(entry);
    }
}
