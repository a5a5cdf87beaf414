//! the interactive snapkv client
//!
//! Reads commands from stdin one line at a time, sends each one raw to the
//! server, and prints the reply. A literal `quit` (case-insensitive) exits;
//! empty input is skipped without contacting the server.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::process::exit;

use clap::{crate_version, App, Arg};
use snapkv::{config, KvClient, KvError, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_CONFIG_FILE: &str = "config/config.json";

fn main() {
    // configure a subscriber that will log messages to STDERR, keeping
    // stdout for replies only
    subscriber_config();

    let matches = App::new("snapkv-client")
        .version(crate_version!())
        .about("an interactive client for the snapkv server")
        .arg(
            Arg::with_name("host")
                .long("host")
                .value_name("IP_ADDR")
                .help("sets the IP address of the server to connect to")
                .default_value(DEFAULT_HOST),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("sets the JSON config file the server port is read from")
                .default_value(DEFAULT_CONFIG_FILE),
        )
        .get_matches();

    let host = matches.value_of("host").unwrap();
    let config_file = matches.value_of("config").unwrap();

    if let Err(e) = run(host, config_file) {
        eprintln!("{}", e);
        exit(1);
    }
}

/// connects to the server and runs the read-eval-print loop until `quit` or
/// end of input
fn run(host: &str, config_file: &str) -> Result<()> {
    let port = config::load_port(Path::new(config_file));
    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|_| {
        KvError::Parsing(format!(
            "could not parse {}:{} into an IP address and port",
            host, port
        ))
    })?;

    let mut client = KvClient::connect(addr)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break; // end of input
        }

        let command = input.trim();
        if command.eq_ignore_ascii_case("quit") {
            break;
        }
        if command.is_empty() {
            continue;
        }

        println!("{}", client.send(command)?);
    }
    Ok(())
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
