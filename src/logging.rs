use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

/// Destination for JSON-lines event output.
pub trait EventSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(line.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    }
}

/// Captures events in memory so tests can assert on them.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("memory sink lock should not be poisoned")
            .clone()
    }
}

impl EventSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .expect("memory sink lock should not be poisoned")
            .push(line.to_string());
        Ok(())
    }
}

fn envelope(event: Value) -> Value {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs_f64())
        .unwrap_or(0.0);
    json!({
        "timestamp": timestamp,
        "event": event,
    })
}

pub fn emit(sink: &dyn EventSink, event: Value) -> io::Result<()> {
    sink.write_line(&envelope(event).to_string())
}

/// Emits a structured render event to stdout, swallowing write errors;
/// logging must never fail a render.
pub fn log_event(event: Value) {
    let _ = emit(&StdoutSink, event);
}
