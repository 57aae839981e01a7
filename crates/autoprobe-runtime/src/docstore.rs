//! Per-element documentation persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use autoprobe_protocols::DocumentationRecord;

/// Documentation store error.
#[derive(Debug, thiserror::Error)]
pub enum DocStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stores one [`DocumentationRecord`] per element uid.
#[async_trait]
pub trait DocumentationStore: Send + Sync {
    /// Load the record for `uid`, if any.
    async fn load(&self, uid: &str) -> Result<Option<DocumentationRecord>, DocStoreError>;

    /// Persist the full record, replacing any previous version.
    async fn save(&self, record: &DocumentationRecord) -> Result<(), DocStoreError>;
}

/// JSON files under the app's documentation directory, one per element.
pub struct FileDocumentationStore {
    directory: PathBuf,
}

impl FileDocumentationStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Node ids contain ':' and ';', which are not portable in file names.
    pub(crate) fn record_path(&self, uid: &str) -> PathBuf {
        let name: String = uid
            .chars()
            .map(|c| match c {
                ':' => '_',
                ';' => '-',
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
                _ => '_',
            })
            .collect();
        self.directory.join(format!("{}.json", name))
    }
}

#[async_trait]
impl DocumentationStore for FileDocumentationStore {
    async fn load(&self, uid: &str) -> Result<Option<DocumentationRecord>, DocStoreError> {
        let path = self.record_path(uid);
        if !path.exists() {
            return Ok(None);
        }

        let json = tokio::fs::read_to_string(&path).await?;
        let record: DocumentationRecord = serde_json::from_str(&json)?;
        Ok(Some(record))
    }

    async fn save(&self, record: &DocumentationRecord) -> Result<(), DocStoreError> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let json = serde_json::to_string_pretty(record)?;
        let path = self.record_path(&record.uid);
        tokio::fs::write(&path, json).await?;
        debug!("Saved documentation for {} to {:?}", record.uid, path);
        Ok(())
    }
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryDocumentationStore {
    records: RwLock<HashMap<String, DocumentationRecord>>,
}

impl MemoryDocumentationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentationStore for MemoryDocumentationStore {
    async fn load(&self, uid: &str) -> Result<Option<DocumentationRecord>, DocStoreError> {
        Ok(self.records.read().get(uid).cloned())
    }

    async fn save(&self, record: &DocumentationRecord) -> Result<(), DocStoreError> {
        self.records
            .write()
            .insert(record.uid.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "docstore_tests.rs"]
mod tests;
