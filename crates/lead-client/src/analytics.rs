//! Analytics event sinks.
//!
//! Records are JSON objects carrying at least an `event` key, in the shape a
//! tag-manager data layer expects.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Receives analytics records. Delivery is fire-and-forget.
pub trait EventSink: Send + Sync {
    fn push(&self, record: Value);
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn push(&self, _record: Value) {}
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Value>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Value> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records whose `event` key equals `name`.
    pub fn events_named(&self, name: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|record| record.get("event").and_then(Value::as_str) == Some(name))
            .collect()
    }
}

impl EventSink for MemorySink {
    fn push(&self, record: Value) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

/// Emits each record as a tracing event.
///
/// Payloads may contain contact data, so only the event name is logged
/// unless `log_payload` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink {
    log_payload: bool,
}

impl LogSink {
    pub fn new(log_payload: bool) -> Self {
        Self { log_payload }
    }
}

impl EventSink for LogSink {
    fn push(&self, record: Value) {
        let event = record
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        if self.log_payload {
            tracing::info!(
                target: "lead_desk::analytics",
                event,
                payload = %record,
                "analytics event"
            );
        } else {
            tracing::info!(target: "lead_desk::analytics", event, "analytics event");
        }
    }
}

/// Appends one JSON document per line to a file.
#[derive(Debug)]
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl EventSink for JsonLinesSink {
    fn push(&self, record: Value) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = serde_json::to_writer(&mut *writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to append analytics event");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_sink_filters_by_event() {
        let sink = MemorySink::new();
        sink.push(json!({"event": "pageview", "page": "/"}));
        sink.push(json!({"event": "generate_lead"}));
        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.events_named("generate_lead").len(), 1);
        assert!(sink.events_named("purchase").is_empty());
    }

    #[test]
    fn json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events/analytics.jsonl");

        let sink = JsonLinesSink::open(&path).unwrap();
        sink.push(json!({"event": "a"}));
        sink.push(json!({"event": "b"}));
        drop(sink);

        let sink = JsonLinesSink::open(&path).unwrap();
        sink.push(json!({"event": "c"}));
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let events: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(
            events,
            vec![json!({"event": "a"}), json!({"event": "b"}), json!({"event": "c"})]
        );
    }

    #[test]
    fn noop_and_log_sinks_accept_anything() {
        NoopSink.push(json!({"event": "x"}));
        LogSink::new(false).push(json!({"no_event": true}));
        LogSink::new(true).push(json!({"event": "x", "email": "a@b.co"}));
    }
}
