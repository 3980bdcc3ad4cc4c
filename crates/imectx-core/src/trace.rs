//! Capture of classifier trace events.
//!
//! The classifier reports each decision as a `tracing` event. A
//! [`TraceCollector`] layer keeps those events in a bounded buffer so a
//! caller can show how a single classification was reached, and a
//! [`TraceReader`] hands them out.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// A single captured event.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub level: Level,
    /// Module path that emitted the event.
    pub target: String,
    pub message: String,
    /// Structured fields other than `message`, in emission order.
    pub fields: Vec<(String, String)>,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} {}", self.level, self.message)?;
        for (name, value) in &self.fields {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct TraceBuffer {
    entries: VecDeque<TraceEntry>,
    capacity: usize,
}

impl TraceBuffer {
    fn push(&mut self, entry: TraceEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}

/// A `tracing` layer recording events whose target starts with a prefix.
#[derive(Debug, Clone)]
pub struct TraceCollector {
    buffer: Arc<Mutex<TraceBuffer>>,
    target_prefix: String,
}

impl TraceCollector {
    /// Collect events from this crate, keeping at most `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self::for_target(capacity, env!("CARGO_CRATE_NAME"))
    }

    /// Collect events whose target starts with `prefix`.
    pub fn for_target(capacity: usize, prefix: impl Into<String>) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(TraceBuffer {
                entries: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
            })),
            target_prefix: prefix.into(),
        }
    }

    pub fn reader(&self) -> TraceReader {
        TraceReader {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl<S: Subscriber> Layer<S> for TraceCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(&self.target_prefix) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut buf) = self.buffer.lock() {
            buf.push(TraceEntry {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message,
                fields: visitor.fields,
            });
        }
    }
}

/// A read handle for captured entries.
#[derive(Debug, Clone)]
pub struct TraceReader {
    buffer: Arc<Mutex<TraceBuffer>>,
}

impl TraceReader {
    /// Snapshot of all captured entries, oldest first.
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.entries.clear();
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }
}
