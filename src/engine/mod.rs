//! This module provides the key/value storage engine used by the server.
//! The only implementation is [`SnapshotStore`], which keeps the mapping in
//! memory and rewrites a full snapshot file on every mutation.
use crate::Result;

/// A handle to a key/value storage engine.
///
/// Handles are cheap to clone; every clone operates on the same underlying
/// store, so one handle can be given to each connection thread.
pub trait KvEngine: Clone + Send + 'static {
    /// sets a `key` and `value`
    ///
    /// If the given `key` already exists the previous `value` will be
    /// overwritten. The mutation is persisted before this method returns.
    fn set(&self, key: String, value: String) -> Result<()>;

    /// Gets the value associated with the given `key`
    ///
    /// Returns `None` if the given `key` does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Removes the given `key` (and associated value) from the store,
    /// returning whether the key existed.
    ///
    /// When an entry was removed, the mutation is persisted before this
    /// method returns. A miss has no side effect at all.
    fn delete(&self, key: &str) -> Result<bool>;
}

mod snapshot;

pub use self::snapshot::SnapshotStore;
