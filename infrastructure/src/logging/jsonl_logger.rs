//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use chrono::{DateTime, Utc};
use duet_application::{ConversationEvent, ConversationLogger};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not create conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// One transcript per run: `<dir>/duet-<started_at>.conversation.jsonl`.
    pub fn for_run(dir: impl AsRef<Path>, started_at: DateTime<Utc>) -> Option<Self> {
        Self::new(dir.as_ref().join(run_file_name(started_at, "conversation.jsonl")))
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `duet-20250101T120000Z.<suffix>`, shared by the diagnostic and transcript logs.
pub fn run_file_name(started_at: DateTime<Utc>, suffix: &str) -> String {
    format!("duet-{}.{}", started_at.format("%Y%m%dT%H%M%SZ"), suffix)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = event
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use duet_domain::AgentRole;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "routing",
            serde_json::json!({
                "token_count": 1200,
                "routing_mode": "planner_primary",
            }),
        ));
        logger.log(ConversationEvent::exchange(
            AgentRole::HeavyLifter,
            "heavylifter_verification",
            "review",
            "looks fine",
            Some(42),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line.get("timestamp").is_some());
        }
        assert_eq!(lines[0]["type"], "routing");
        assert_eq!(lines[0]["token_count"], 1200);
        assert_eq!(lines[1]["type"], "model_exchange");
        assert_eq!(lines[1]["agent"], "heavylifter");
        assert_eq!(lines[1]["tokens"], 42);
    }

    #[test]
    fn test_jsonl_logger_uses_event_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ts.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        let mut event = ConversationEvent::new("workflow_complete", serde_json::json!({}));
        event.timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        logger.log(event);
        drop(logger);

        assert_eq!(read_lines(&path)[0]["timestamp"], "2025-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_jsonl_logger_handles_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test2.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "simple_event",
            serde_json::json!("just a string"),
        ));
        drop(logger);

        let value = &read_lines(&path)[0];
        assert_eq!(value["type"], "simple_event");
        assert_eq!(value["data"], "just a string");
    }

    #[test]
    fn test_for_run_names_file_by_start_time() {
        let dir = tempfile::tempdir().unwrap();
        let started = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let logger = JsonlConversationLogger::for_run(dir.path().join("logs"), started).unwrap();
        assert!(
            logger
                .path()
                .ends_with("logs/duet-20250102T030405Z.conversation.jsonl")
        );
    }
}
