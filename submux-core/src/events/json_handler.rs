//! JSON event handler for structured output
//!
//! Writes every batch event as one JSON object per line, for consumption by
//! scripts or a separate front end.

use super::{Event, EventHandler};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs events as JSON lines
pub struct JsonEventHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventHandler {
    /// Create a new JSON event handler that writes to stdout
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a new JSON event handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    /// Get current timestamp as seconds since Unix epoch
    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Serializes `event` with a `timestamp` field added.
    pub fn to_json(event: &Event) -> serde_json::Value {
        let mut value = serde_json::to_value(event).unwrap_or_else(|e| {
            json!({
                "type": "serialization_error",
                "message": e.to_string(),
            })
        });
        if let Some(object) = value.as_object_mut() {
            object.insert("timestamp".to_string(), json!(Self::get_timestamp()));
        }
        value
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{}", json_str);
                let _ = output.flush();
            }
        }
    }
}

impl EventHandler for JsonEventHandler {
    fn handle(&self, event: &Event) {
        self.write_json(Self::to_json(event));
    }
}

impl Default for JsonEventHandler {
    fn default() -> Self {
        Self::new()
    }
}
