//! Implements the `Store` trait with a JSON file on disk.

use crate::backup::Backup;
use crate::model::Transaction;
use crate::store::{Store, TRANSACTIONS};
use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Persists the transaction sequence as a pretty-printed JSON array at `path`.
///
/// Writes go to a sibling temporary file which is then renamed over `path`, so a crash mid-write
/// leaves the previous contents intact. If a `Backup` is attached, the previous file is copied
/// into the backups directory before it is replaced.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    backup: Option<Backup>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: None,
        }
    }

    /// Take a rotated backup of the existing file before each write.
    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait::async_trait]
impl Store for FileStore {
    async fn read(&mut self) -> Result<Option<Vec<Transaction>>> {
        if !self.path.exists() {
            trace!("No transactions file at {}", self.path.display());
            return Ok(None);
        }
        utils::deserialize(&self.path).await.map(Some)
    }

    async fn write(&mut self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)
            .context("Failed to serialize transactions to JSON")?;
        if let Some(backup) = &self.backup {
            backup.save_copy(TRANSACTIONS, &self.path).await?;
        }
        let temp = self.temp_path();
        utils::write(&temp, json).await?;
        utils::rename(&temp, &self.path).await?;
        trace!(
            "Wrote {} transactions to {}",
            transactions.len(),
            self.path.display()
        );
        Ok(())
    }
}
