// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed `ProcessedStore` with crash-safe writes: serialize to
//! JSON, compress with zstd, write to a `.tmp` sibling, fsync it, rename
//! over the real path, then fsync the containing directory. A reader
//! that opens the store mid-write never observes a partial file — the
//! rename is the only operation that makes the new content visible.

use async_trait::async_trait;
use parking_lot::Mutex;
use pilot_core::{ProcessedStore, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Abstracts the filesystem operations a snapshot write performs, so
/// tests can inject failures without touching a real disk.
pub trait SnapshotWriter: Send + Sync + 'static {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> std::io::Result<()>;
    fn fsync_file(&self, path: &Path) -> std::io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()>;
    fn fsync_dir(&self, path: &Path) -> std::io::Result<()>;
    fn read(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>>;
}

#[derive(Clone, Default)]
pub struct FsSnapshotWriter;

impl SnapshotWriter for FsSnapshotWriter {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(data)?;
        Ok(())
    }

    fn fsync_file(&self, path: &Path) -> std::io::Result<()> {
        File::open(path)?.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        std::fs::rename(from, to)
    }

    fn fsync_dir(&self, path: &Path) -> std::io::Result<()> {
        File::open(path)?.sync_all()
    }

    fn read(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Snapshot {
    /// issue number -> note passed to `mark`
    marked: HashMap<u64, String>,
}

/// Durable, file-backed `ProcessedStore`. Holds the full set in memory
/// and rewrites the whole snapshot file on every mutation — acceptable
/// since processed-set writes are best-effort and infrequent relative to
/// the poll interval (spec §4.1.6).
pub struct FileProcessedStore<W: SnapshotWriter = FsSnapshotWriter> {
    writer: W,
    path: PathBuf,
    compression_level: i32,
    state: Arc<Mutex<HashMap<u64, String>>>,
}

impl FileProcessedStore<FsSnapshotWriter> {
    /// Loads any existing snapshot at `path` synchronously at
    /// construction time (spec §4.1.6 `loadProcessed`, called once at
    /// startup).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Self::open_with_writer(FsSnapshotWriter, path)
    }
}

impl<W: SnapshotWriter + Clone> FileProcessedStore<W> {
    pub fn open_with_writer(writer: W, path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = load_snapshot(&writer, &path)?.unwrap_or_default();
        Ok(Self { writer, path, compression_level: 3, state: Arc::new(Mutex::new(state.marked)) })
    }

    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Serializes, compresses, and durably writes the current state.
    /// Runs on a blocking-pool thread since fsync is a synchronous
    /// syscall that would otherwise stall the async runtime.
    async fn persist(&self) -> Result<(), StorageError>
    where
        W: Clone,
    {
        let snapshot = Snapshot { marked: self.state.lock().clone() };
        let writer = self.writer.clone();
        let path = self.path.clone();
        let level = self.compression_level;
        tokio::task::spawn_blocking(move || write_snapshot(&writer, &path, &snapshot, level))
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
    }
}

fn load_snapshot<W: SnapshotWriter>(writer: &W, path: &Path) -> Result<Option<Snapshot>, StorageError> {
    let Some(bytes) = writer.read(path).map_err(|e| StorageError::Io(e.to_string()))? else {
        return Ok(None);
    };
    let decompressed =
        zstd::decode_all(bytes.as_slice()).map_err(|e| StorageError::Io(e.to_string()))?;
    let snapshot: Snapshot =
        serde_json::from_slice(&decompressed).map_err(|e| StorageError::Serde(e.to_string()))?;
    Ok(Some(snapshot))
}

fn write_snapshot<W: SnapshotWriter>(
    writer: &W,
    path: &Path,
    snapshot: &Snapshot,
    compression_level: i32,
) -> Result<(), StorageError> {
    let json = serde_json::to_vec(snapshot).map_err(|e| StorageError::Serde(e.to_string()))?;
    let compressed = zstd::encode_all(json.as_slice(), compression_level)
        .map_err(|e| StorageError::Io(e.to_string()))?;

    let tmp_path = path.with_extension("tmp");
    writer.write_tmp(&tmp_path, &compressed).map_err(|e| StorageError::Io(e.to_string()))?;
    writer.fsync_file(&tmp_path).map_err(|e| StorageError::Io(e.to_string()))?;
    writer.rename(&tmp_path, path).map_err(|e| StorageError::Io(e.to_string()))?;
    if let Some(parent) = path.parent() {
        writer.fsync_dir(parent).map_err(|e| StorageError::Io(e.to_string()))?;
    }
    Ok(())
}

#[async_trait]
impl<W: SnapshotWriter + Clone> ProcessedStore for FileProcessedStore<W> {
    async fn mark(&self, issue_number: u64, note: &str) -> Result<(), StorageError> {
        self.state.lock().insert(issue_number, note.to_string());
        self.persist().await
    }

    async fn unmark(&self, issue_number: u64) -> Result<(), StorageError> {
        self.state.lock().remove(&issue_number);
        self.persist().await
    }

    async fn is_processed(&self, issue_number: u64) -> Result<bool, StorageError> {
        Ok(self.state.lock().contains_key(&issue_number))
    }

    async fn load_all(&self) -> Result<HashSet<u64>, StorageError> {
        Ok(self.state.lock().keys().copied().collect())
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
