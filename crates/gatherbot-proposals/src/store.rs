//! Flat-file proposal store with exclusive access.
//!
//! The whole collection lives in one JSON document, read fully and written
//! fully on every mutation. Writes go through a temp file and an atomic
//! rename, so a reader never observes a partial document. All
//! read-modify-write cycles must run through [`ProposalStore::with_exclusive`];
//! a bare `load_all` + `save_all` pair is a lost-update race under concurrent
//! mutators.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use gatherbot_core::error::{GatherBotError, Result};

use crate::proposal::Proposal;

/// File-backed proposal store.
///
/// Clones share the same lock, so every handle to the same document
/// serializes its mutations against the others.
#[derive(Clone)]
pub struct ProposalStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    lock_timeout: Duration,
}

impl ProposalStore {
    /// Create a store backed by the given file.
    pub fn new(path: &Path, lock_timeout: Duration) -> Self {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self {
            path: path.to_path_buf(),
            lock: Arc::new(Mutex::new(())),
            lock_timeout,
        }
    }

    /// Default store path (~/.gatherbot/proposals.json).
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".gatherbot").join("proposals.json")
    }

    /// Read the current collection. Empty if no document exists yet.
    pub async fn load_all(&self) -> Result<Vec<Proposal>> {
        let _guard = self.acquire().await?;
        self.read_unlocked()
    }

    /// Replace the durable collection.
    pub async fn save_all(&self, proposals: &[Proposal]) -> Result<()> {
        let _guard = self.acquire().await?;
        self.write_unlocked(proposals)
    }

    /// Run a read-modify-write cycle under the exclusive lock.
    ///
    /// The collection is loaded, handed to `action` for in-memory mutation,
    /// and persisted after `action` succeeds. The lock is released on every
    /// exit path; when `action` fails nothing is written back.
    pub async fn with_exclusive<T, F>(&self, action: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Proposal>) -> Result<T>,
    {
        let _guard = self.acquire().await?;
        let mut proposals = self.read_unlocked()?;
        let out = action(&mut proposals)?;
        self.write_unlocked(&proposals)?;
        Ok(out)
    }

    /// Acquire the lock within the configured timeout.
    async fn acquire(&self) -> Result<tokio::sync::MutexGuard<'_, ()>> {
        tokio::time::timeout(self.lock_timeout, self.lock.lock())
            .await
            .map_err(|_| {
                GatherBotError::StorageUnavailable(format!(
                    "exclusive access not acquired within {:?}",
                    self.lock_timeout
                ))
            })
    }

    fn read_unlocked(&self) -> Result<Vec<Proposal>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            GatherBotError::StorageUnavailable(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            GatherBotError::CorruptState(format!("cannot parse {}: {e}", self.path.display()))
        })
    }

    fn write_unlocked(&self, proposals: &[Proposal]) -> Result<()> {
        let json = serde_json::to_string_pretty(proposals)
            .map_err(|e| GatherBotError::CorruptState(format!("serialize failed: {e}")))?;
        // Temp file + rename keeps concurrent readers off partial documents.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| {
            GatherBotError::StorageUnavailable(format!("cannot write {}: {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            GatherBotError::StorageUnavailable(format!(
                "cannot replace {}: {e}",
                self.path.display()
            ))
        })?;
        tracing::debug!("Saved {} proposal(s) to {}", proposals.len(), self.path.display());
        Ok(())
    }
}
