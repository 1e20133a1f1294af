//! Event log persistence
//!
//! Newline-delimited JSON: one [`RawEvent`] per line. Unknown fields are
//! ignored on load; malformed lines are skipped with a warning rather than
//! failing the whole load.

use super::types::RawEvent;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// NDJSON event log reader/writer
pub struct EventLog;

impl EventLog {
    /// Save events, one JSON object per line
    pub fn save(events: &[RawEvent], path: &Path) -> crate::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        for event in events {
            serde_json::to_writer(&mut writer, event)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Load events, skipping malformed lines
    pub fn load(path: &Path) -> crate::Result<Vec<RawEvent>> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        let mut skipped = 0usize;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawEvent>(&line) {
                Ok(event) => events.push(event),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, path = %path.display(), "skipped malformed event log lines");
        }
        Ok(events)
    }
}
