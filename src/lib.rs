#![deny(missing_docs)]
//! A multithreaded, persistent, networked key-value store that maps
//! [`String`] keys to [`String`] values.
//!
//! This crate provides the [`SnapshotStore`] engine itself, as well as a
//! [`snapkv-server`] and [`snapkv-client`] executable that can be used to
//! interact with it. Data is exchanged between client and server over a
//! plaintext line protocol using synchronous networking.
//!
//! ## Supported Storage Operations
//! The engine supports three types of operations (a.k.a "commands"):
//!
//! - `SET` a key/value pair in the store
//! - `GET` a value associated with a key from the store
//! - `DEL` a key/value pair from the store
//!
//! See the [`KvEngine`] trait and the [`Request`] and [`Response`] types for
//! more information on the structure of these operations.
//!
//! ## SnapshotStore
//! [`SnapshotStore`] is the implementor of the [`KvEngine`] trait and the
//! brains of this entire operation. It is responsible for the following
//! tasks:
//! - processing the GET, SET and DEL operations
//! - maintaining kv data within an in-memory map, fully serialized behind a
//!   single lock so the effects of two operations never interleave
//! - persisting the entire mapping into a snapshot file on every mutation,
//!   before the mutating call returns
//! - loading the snapshot file at start-up
//!
//! ## Client / Server
//! Client and server logic is contained in the [`KvClient`] and [`KvServer`]
//! structs. The server accepts connections and serves each one on its own
//! thread from a [`ThreadPool`]; the client holds a single connection and
//! exchanges raw protocol lines over it.
//!
//! ## Wire Protocol
//! One command per line, tokens separated by whitespace, command names
//! case-insensitive:
//!
//! - `SET <key> <value>` is answered with `OK`
//! - `GET <key>` is answered with the value, or `NULL` if the key is absent
//! - `DEL <key>` is answered with `OK` if the key existed, else `NULL`
//! - anything else is answered with `ERROR: Invalid command` (a blank line
//!   with `ERROR: Empty command`)
//!
//! ## Snapshot File
//! The persisted state is a single JSON object of string keys to string
//! values, for example `{"city":"lisbon"}`. The file is rewritten wholesale
//! on every mutation; the cost of that full dump is the documented tradeoff
//! for a file that always holds one complete, consistent state.
//!
//! ### Client / Server executables
//! As mentioned previously, client and server command line executables are
//! provided. Both read their port from a JSON config file, falling back to
//! port 6379 when the file is missing or invalid.
//!
//! [`String`]: https://doc.rust-lang.org/std/string/struct.String.html
//! [`snapkv-server`]: ./bin/snapkv-server.rs
//! [`snapkv-client`]: ./bin/snapkv-client.rs

pub use client::KvClient;
pub use command::{ProtocolError, Request, Response};
pub use engine::{KvEngine, SnapshotStore};
pub use error::{KvError, Result};
pub use server::{KvServer, ShutdownHandle};
pub use thread_pool::{RayonThreadPool, SharedQueueThreadPool, SpawningThreadPool, ThreadPool};

mod client;
mod command;
pub mod config;
mod engine;
mod error;
mod server;
pub mod thread_pool;
