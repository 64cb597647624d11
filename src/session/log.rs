// ABOUTME: JSONL activity logger — appends one line per backend interaction.
// ABOUTME: Stores one timestamped log file per app run under ~/.codedeck/logs/.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single JSONL log entry: when, what kind of interaction, and a short detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub kind: String,
    pub detail: String,
}

/// Appends backend interactions as JSONL lines to a per-run log file.
pub struct ActivityLog {
    writer: BufWriter<File>,
}

impl ActivityLog {
    /// Create a logger writing to a new timestamped file in `logs_dir`.
    pub fn create(logs_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(logs_dir)?;
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let log_path = logs_dir.join(format!("{}.jsonl", timestamp));
        let file = File::create(&log_path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one entry and flush so a crash loses nothing.
    pub fn record(&mut self, kind: &str, detail: &str) -> anyhow::Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind: kind.to_string(),
            detail: detail.to_string(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}
