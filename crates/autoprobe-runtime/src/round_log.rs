//! Per-round JSONL logs of model exchanges.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// One decision exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreLogEntry {
    pub step: u32,
    pub prompt: String,
    pub image: String,
    pub response: String,
}

/// One reflection exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectLogEntry {
    pub step: u32,
    pub prompt: String,
    pub image_before: String,
    pub image_after: String,
    pub response: String,
}

/// Append-only JSON-lines writer.
pub struct RoundLogWriter {
    file: Mutex<File>,
}

impl RoundLogWriter {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        debug!("Opened round log: {:?}", path);

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Write one entry as a single line.
    pub async fn write<T: Serialize>(&self, entry: &T) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        let mut file = self.file.lock().await;
        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_line_per_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("task").join("log_explore_t.txt");
        let writer = RoundLogWriter::open(&path).await.unwrap();

        for step in 1..=2 {
            writer
                .write(&ExploreLogEntry {
                    step,
                    prompt: "multi\nline prompt".into(),
                    image: format!("{}_before_labeled.png", step),
                    response: "Action: tap(1)".into(),
                })
                .await
                .unwrap();
        }

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: ExploreLogEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.step, 2);
        assert_eq!(second.prompt, "multi\nline prompt");
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log_reflect_t.txt");
        let entry = ReflectLogEntry {
            step: 1,
            prompt: "p".into(),
            image_before: "1_before_labeled.png".into(),
            image_after: "1_after_labeled.png".into(),
            response: "Decision: SUCCESS".into(),
        };

        RoundLogWriter::open(&path).await.unwrap().write(&entry).await.unwrap();
        RoundLogWriter::open(&path).await.unwrap().write(&entry).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 2);
        let value: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(value["image_after"], "1_after_labeled.png");
    }
}
