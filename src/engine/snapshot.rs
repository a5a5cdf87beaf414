use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use super::KvEngine;
use crate::error::{KvError, Result};

/// The primary struct for working with a snapkv store.
///
/// The whole mapping lives in memory behind a single mutex; every operation,
/// reads included, takes that lock, so the effects of any two operations
/// never interleave. Each successful mutation rewrites the snapshot file with
/// the entire mapping before the lock is released, which keeps the file at
/// most one in-flight mutation behind memory.
///
/// Rewriting the whole file costs O(total entries) per mutation. That is the
/// persistence contract of this store, not an accident; it is only suitable
/// for small datasets.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    // the current mapping. Only reachable through the lock
    entries: HashMap<String, String>,

    // file the mapping is serialized into after every mutation
    snapshot_path: PathBuf,
}

impl SnapshotStore {
    /// Opens a store backed by the snapshot file at `snapshot_path`.
    ///
    /// If the file exists its contents become the initial mapping; if it does
    /// not exist the store starts empty and the file is created on the first
    /// mutation.
    ///
    /// # Errors
    /// returns [`KvError::Snapshot`] if the file exists but cannot be parsed.
    /// Starting with a partial or guessed mapping is never attempted.
    pub fn open(snapshot_path: impl Into<PathBuf>) -> Result<SnapshotStore> {
        let snapshot_path = snapshot_path.into();

        let entries: HashMap<String, String> = if snapshot_path.exists() {
            let reader = BufReader::new(File::open(&snapshot_path)?);
            serde_json::from_reader(reader).map_err(|source| KvError::Snapshot {
                path: snapshot_path.clone(),
                source,
            })?
        } else {
            HashMap::new()
        };
        info!("loaded {} entries from {:?}", entries.len(), &snapshot_path);

        Ok(SnapshotStore {
            inner: Arc::new(Mutex::new(Inner {
                entries,
                snapshot_path,
            })),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| KvError::Poisoned)
    }
}

impl Inner {
    // serializes the entire mapping over the snapshot file. Must only be
    // called while the store lock is held
    fn write_snapshot(&self) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.snapshot_path)?);
        serde_json::to_writer(&mut writer, &self.entries)?;
        writer.flush()?;
        debug!("snapshot written, {} entries", self.entries.len());
        Ok(())
    }
}

impl KvEngine for SnapshotStore {
    fn set(&self, key: String, value: String) -> Result<()> {
        let mut inner = self.lock()?;
        inner.entries.insert(key, value);
        inner.write_snapshot()
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.entries.remove(key).is_some() {
            inner.write_snapshot()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
