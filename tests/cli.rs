//! Tests that drive the compiled server and client binaries the way an
//! operator would, wiring the port through a config file.

use std::fs;
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use tempfile::TempDir;

/// picks a port the OS currently considers free
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// a running server binary, killed when the test ends
struct ServerProcess(Child);

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// writes a config file for `port` into `dir` and returns its path
fn write_config(dir: &TempDir, port: u16) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, format!(r#"{{"port": {}}}"#, port)).unwrap();
    path
}

fn start_server(dir: &TempDir, port: u16) -> ServerProcess {
    let config = write_config(dir, port);
    let child = Command::new(cargo_bin("snapkv-server"))
        .arg("--config")
        .arg(&config)
        .arg("--snapshot")
        .arg(dir.path().join("snapshot.json"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let server = ServerProcess(child);

    // wait for the listener to come up
    for _ in 0..50 {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return server;
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("server did not start listening on port {}", port);
}

#[test]
fn client_repl_round_trip() {
    let dir = TempDir::new().unwrap();
    let port = free_port();
    let _server = start_server(&dir, port);

    assert_cmd::Command::new(cargo_bin("snapkv-client"))
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("SET city lisbon\nGET city\nDEL city\nGET city\nquit\n")
        .timeout(Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"))
        .stdout(predicate::str::contains("lisbon"))
        .stdout(predicate::str::contains("NULL"));
}

#[test]
fn client_reports_protocol_errors() {
    let dir = TempDir::new().unwrap();
    let port = free_port();
    let _server = start_server(&dir, port);

    assert_cmd::Command::new(cargo_bin("snapkv-client"))
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("FOO\nquit\n")
        .timeout(Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR: Invalid command"));
}

#[test]
fn server_refuses_to_start_on_a_corrupt_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    fs::write(&snapshot, "this is not json").unwrap();
    let config = write_config(&dir, free_port());

    assert_cmd::Command::new(cargo_bin("snapkv-server"))
        .arg("--config")
        .arg(&config)
        .arg("--snapshot")
        .arg(&snapshot)
        .timeout(Duration::from_secs(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not parseable"));
}
