use std::fmt;
use thiserror::Error;

/// These are the request "commands" that a client can send, one per line,
/// as whitespace-separated tokens. Command names are matched
/// case-insensitively.
#[derive(Debug, PartialEq)]
pub enum Request {
    /// set a key/value in the store: `SET <key> <value>`
    Set {
        /// the key to set
        key: String,
        /// the value to store under the key
        value: String,
    },
    /// get a value from the store: `GET <key>`
    Get {
        /// the key to search for
        key: String,
    },
    /// remove a key/value from the store: `DEL <key>`
    Del {
        /// the key to remove
        key: String,
    },
}

/// A request line that could not be parsed into a [`Request`].
/// The display text of each variant is the text sent to the client after
/// `ERROR: `.
#[derive(Error, Debug, PartialEq)]
pub enum ProtocolError {
    /// the line contained no tokens at all
    #[error("Empty command")]
    Empty,
    /// unknown command name, or the wrong number of arguments for a known one
    #[error("Invalid command")]
    Invalid,
}

impl Request {
    /// Parses one line of client input into a [`Request`].
    ///
    /// The line is split on whitespace; the first token is the command name,
    /// and the remaining tokens must match the command's arity exactly.
    pub fn parse(line: &str) -> std::result::Result<Request, ProtocolError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = tokens.split_first().ok_or(ProtocolError::Empty)?;

        match (name.to_ascii_uppercase().as_str(), args) {
            ("SET", [key, value]) => Ok(Request::Set {
                key: key.to_string(),
                value: value.to_string(),
            }),
            ("GET", [key]) => Ok(Request::Get {
                key: key.to_string(),
            }),
            ("DEL", [key]) => Ok(Request::Del {
                key: key.to_string(),
            }),
            _ => Err(ProtocolError::Invalid),
        }
    }
}

/// The reply types that can be returned for any request. `Display` renders
/// the exact wire text; the server appends the terminating newline.
#[derive(Debug, PartialEq)]
pub enum Response {
    /// the mutation was applied
    Ok,
    /// the value found by a GET
    Value(String),
    /// the key was absent (a GET miss or a DEL miss)
    Null,
    /// the request failed; the text is rendered after `ERROR: `
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Value(value) => write!(f, "{}", value),
            Response::Null => write!(f, "NULL"),
            Response::Error(reason) => write!(f, "ERROR: {}", reason),
        }
    }
}
