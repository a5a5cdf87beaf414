//! Loading of the listening port from a JSON config file.
//!
//! Server and client read the same file the same way: a missing or
//! unparseable file logs a warning and falls back to [`DEFAULT_PORT`], so a
//! bad config never prevents startup.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// the port used when the config file is missing or invalid
pub const DEFAULT_PORT: u16 = 6379;

#[derive(Debug, Deserialize)]
struct ConfigFile {
    port: Option<u16>,
}

/// Reads the listening port from the JSON config file at `path`, e.g.
/// `{"port": 6400}`.
///
/// Falls back to [`DEFAULT_PORT`] with a logged warning when the file is
/// missing, unreadable, or not valid JSON. A file that parses but has no
/// `port` field uses the default silently.
pub fn load_port(path: &Path) -> u16 {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(
                "config file {:?} not readable ({}), using default port {}",
                path, e, DEFAULT_PORT
            );
            return DEFAULT_PORT;
        }
    };

    match serde_json::from_str::<ConfigFile>(&contents) {
        Ok(config) => config.port.unwrap_or(DEFAULT_PORT),
        Err(e) => {
            warn!(
                "error reading config file {:?}: {}, using default port {}",
                path, e, DEFAULT_PORT
            );
            DEFAULT_PORT
        }
    }
}
