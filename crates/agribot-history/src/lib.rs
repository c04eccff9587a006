//! Append-only conversation history stored as JSON lines.
//!
//! One `ConversationRecord` per line. Appends are serialized through a mutex
//! so concurrent writers never interleave partial lines.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use agribot_core::traits::ConversationSink;
use agribot_core::types::ConversationRecord;

pub struct ConversationLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConversationLog {
    /// Prepares the log at `path`, creating parent directories. The file
    /// itself is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn append(&self, record: &ConversationRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let _guard = self.write_lock.lock().map_err(|_| anyhow!("history writer lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), messages = record.messages.len(), "Appended conversation record");
        Ok(())
    }

    /// Every record in file order. A log that was never written is empty.
    pub fn read_all(&self) -> Result<Vec<ConversationRecord>> {
        if !self.path.exists() { return Ok(Vec::new()); }
        let file = fs::File::open(&self.path).with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let record = serde_json::from_str(&line)
                .with_context(|| format!("{}: malformed record on line {}", self.path.display(), i + 1))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl ConversationSink for ConversationLog {
    fn append(&self, record: &ConversationRecord) -> Result<()> { Self::append(self, record) }
}
