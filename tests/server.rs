//! End-to-end tests that drive a running server over real TCP connections.

use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::thread::{self, JoinHandle};

use snapkv::thread_pool::{SharedQueueThreadPool, SpawningThreadPool, ThreadPool};
use snapkv::{KvClient, KvServer, ShutdownHandle, SnapshotStore};
use tempfile::TempDir;

/// a server bound to an OS-assigned port, running on its own thread
struct TestServer {
    addr: SocketAddr,
    handle: ShutdownHandle,
    thread: JoinHandle<()>,
}

impl TestServer {
    fn start(snapshot_path: &Path) -> TestServer {
        let engine = SnapshotStore::open(snapshot_path).unwrap();
        let pool = SpawningThreadPool::new(4).unwrap();
        let server = KvServer::bind(engine, pool, "127.0.0.1:0").unwrap();
        let addr = server.local_addr();
        let handle = server.shutdown_handle();
        let thread = thread::spawn(move || server.run().unwrap());

        TestServer {
            addr,
            handle,
            thread,
        }
    }

    fn client(&self) -> KvClient {
        KvClient::connect(self.addr).unwrap()
    }

    fn stop(self) {
        self.handle.shutdown();
        self.thread.join().unwrap();
    }
}

#[test]
fn set_get_del_scenario() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let mut client = server.client();

    assert_eq!(client.send("SET a 1").unwrap(), "OK");
    assert_eq!(client.send("GET a").unwrap(), "1");
    assert_eq!(client.send("DEL a").unwrap(), "OK");
    assert_eq!(client.send("GET a").unwrap(), "NULL");
    assert_eq!(client.send("DEL a").unwrap(), "NULL");

    server.stop();
}

#[test]
fn get_on_empty_store_returns_null() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let mut client = server.client();

    assert_eq!(client.send("GET missing").unwrap(), "NULL");

    server.stop();
}

#[test]
fn commands_are_case_insensitive_on_the_wire() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let mut client = server.client();

    assert_eq!(client.send("set b 2").unwrap(), "OK");
    assert_eq!(client.send("get b").unwrap(), "2");
    assert_eq!(client.send("del b").unwrap(), "OK");

    server.stop();
}

#[test]
fn unknown_command_gets_an_error_reply() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let mut client = server.client();

    assert_eq!(client.send("FOO").unwrap(), "ERROR: Invalid command");
    assert_eq!(client.send("SET only-a-key").unwrap(), "ERROR: Invalid command");
    // the connection stays open after an error reply
    assert_eq!(client.send("SET c 3").unwrap(), "OK");

    server.stop();
}

#[test]
fn empty_line_gets_an_error_reply() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let mut client = server.client();

    assert_eq!(client.send("").unwrap(), "ERROR: Empty command");
    assert_eq!(client.send("GET x").unwrap(), "NULL");

    server.stop();
}

#[test]
fn disconnecting_client_leaves_the_server_running() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));

    {
        let mut first = server.client();
        assert_eq!(first.send("SET k v").unwrap(), "OK");
    } // first connection dropped here

    let mut second = server.client();
    assert_eq!(second.send("GET k").unwrap(), "v");

    server.stop();
}

#[test]
fn mapping_survives_a_server_restart() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.json");

    let server = TestServer::start(&snapshot);
    let mut client = server.client();
    assert_eq!(client.send("SET a 1").unwrap(), "OK");
    assert_eq!(client.send("SET b 2").unwrap(), "OK");
    assert_eq!(client.send("DEL a").unwrap(), "OK");
    drop(client);
    server.stop();

    let restarted = TestServer::start(&snapshot);
    let mut client = restarted.client();
    assert_eq!(client.send("GET a").unwrap(), "NULL");
    assert_eq!(client.send("GET b").unwrap(), "2");

    restarted.stop();
}

#[test]
fn concurrent_clients_lose_no_updates() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));

    let mut writers = Vec::new();
    for t in 0..8 {
        let addr = server.addr;
        writers.push(thread::spawn(move || {
            let mut client = KvClient::connect(addr).unwrap();
            for i in 0..20 {
                let reply = client.send(&format!("SET k{}-{} {}", t, i, i)).unwrap();
                assert_eq!(reply, "OK");
            }
        }));
    }
    for writer in writers {
        writer.join().unwrap();
    }

    let mut client = server.client();
    for t in 0..8 {
        for i in 0..20 {
            assert_eq!(client.send(&format!("GET k{}-{}", t, i)).unwrap(), i.to_string());
        }
    }

    server.stop();
}

#[test]
fn serves_connections_from_a_bounded_pool() {
    let dir = TempDir::new().unwrap();
    let engine = SnapshotStore::open(dir.path().join("snapshot.json")).unwrap();
    let pool = SharedQueueThreadPool::new(4).unwrap();
    let server = KvServer::bind(engine, pool, "127.0.0.1:0").unwrap();
    let addr = server.local_addr();
    let handle = server.shutdown_handle();
    let thread = thread::spawn(move || server.run().unwrap());

    let mut client = KvClient::connect(addr).unwrap();
    assert_eq!(client.send("SET pooled yes").unwrap(), "OK");
    assert_eq!(client.send("GET pooled").unwrap(), "yes");
    drop(client);

    handle.shutdown();
    thread.join().unwrap();
}

#[test]
fn shutdown_stops_the_accept_loop() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::start(&dir.path().join("snapshot.json"));
    let addr = server.addr;

    server.stop();

    // the listener is released, so new connections are refused
    assert!(TcpStream::connect(addr).is_err());
}
