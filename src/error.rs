use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// type alias for all operations in this crate that can fail with a [`KvError`]
pub type Result<T> = std::result::Result<T, KvError>;

/// The error variants used by the snapkv crate.
/// It wraps the lower level errors from socket and file IO and from the
/// serde_json snapshot encoding.
#[derive(Error, Debug)]
pub enum KvError {
    /// variant for errors caused by socket or file IO
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// the snapshot file exists but its contents could not be parsed.
    /// This is fatal at startup, the store never guesses at a recovery
    #[error("snapshot file {path:?} is not parseable: {source}")]
    Snapshot {
        /// path of the offending snapshot file
        path: PathBuf,
        /// the parse error reported by serde_json
        source: serde_json::Error,
    },

    /// variant for errors while serializing the mapping into the snapshot file
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// a command line argument or socket address could not be parsed
    #[error("{0}")]
    Parsing(String),

    /// a thread pool could not be constructed
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// the store lock was poisoned by a panicking thread
    #[error("store lock poisoned")]
    Poisoned,

    /// the server closed the connection while a reply was still expected
    #[error("server closed the connection")]
    Disconnected,
}
