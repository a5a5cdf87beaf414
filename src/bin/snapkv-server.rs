//! this binary starts the snapkv server
//! to see the list of options, type: `snapkv-server --help`

use std::net::SocketAddr;
use std::path::Path;
use std::process::exit;

use clap::{arg_enum, crate_version, value_t, App, Arg};
use snapkv::thread_pool::{RayonThreadPool, SharedQueueThreadPool, SpawningThreadPool, ThreadPool};
use snapkv::{config, KvEngine, KvError, KvServer, Result, SnapshotStore};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

arg_enum! {
    #[allow(non_camel_case_types)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Pool {
        spawning,
        shared_queue,
        rayon
    }
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_CONFIG_FILE: &str = "config/config.json";
const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.json";
const DEFAULT_POOL: Pool = Pool::spawning;
const DEFAULT_THREADS: u32 = 8;

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    addr: SocketAddr,
    snapshot_file: String,
    pool: Pool,
    threads: u32,
}

fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    // parse command line args
    let matches = App::new("snapkv-server")
        .version(crate_version!())
        .about("a multi-threaded, snapshotting key-value store server")
        .arg(
            Arg::with_name("host")
                .long("host")
                .value_name("IP_ADDR")
                .help("sets the IP address the server listens on")
                .default_value(DEFAULT_HOST),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("sets the JSON config file the listening port is read from")
                .default_value(DEFAULT_CONFIG_FILE),
        )
        .arg(
            Arg::with_name("snapshot")
                .long("snapshot")
                .value_name("FILE")
                .help("sets the snapshot file that persists the store")
                .default_value(DEFAULT_SNAPSHOT_FILE),
        )
        .arg(
            Arg::with_name("pool")
                .long("pool")
                .value_name("POOL_NAME")
                .help("sets the thread pool serving connections, one of 'spawning', 'shared_queue' or 'rayon'")
                .default_value("spawning"),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .value_name("N")
                .help("sets the thread count for the shared_queue and rayon pools")
                .default_value("8"),
        )
        .get_matches();

    let host = matches.value_of("host").unwrap();
    let config_file = matches.value_of("config").unwrap();
    let snapshot_file = matches.value_of("snapshot").unwrap();
    let pool = value_t!(matches, "pool", Pool).ok().unwrap_or(DEFAULT_POOL);
    let threads = value_t!(matches, "threads", u32)
        .ok()
        .unwrap_or(DEFAULT_THREADS);

    // the port comes from the config file, never from the command line
    let port = config::load_port(Path::new(config_file));

    let opt = match build_opt(host, port, snapshot_file, pool, threads) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    // start the server
    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

/// validates the host/port combination and collects the options
fn build_opt(
    host: &str,
    port: u16,
    snapshot_file: &str,
    pool: Pool,
    threads: u32,
) -> Result<Opt> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|_| {
        KvError::Parsing(format!(
            "could not parse {}:{} into an IP address and port",
            host, port
        ))
    })?;

    Ok(Opt {
        addr,
        snapshot_file: snapshot_file.to_string(),
        pool,
        threads,
    })
}

fn run(opt: Opt) -> Result<()> {
    info!("snapkv-server {}", env!("CARGO_PKG_VERSION"));
    info!("thread pool: {}, snapshot file: {}", opt.pool, opt.snapshot_file);

    let engine = SnapshotStore::open(&opt.snapshot_file)?;

    match opt.pool {
        Pool::spawning => run_with_pool(engine, SpawningThreadPool::new(opt.threads)?, opt.addr),
        Pool::shared_queue => {
            run_with_pool(engine, SharedQueueThreadPool::new(opt.threads)?, opt.addr)
        }
        Pool::rayon => run_with_pool(engine, RayonThreadPool::new(opt.threads)?, opt.addr),
    }
}

fn run_with_pool<E: KvEngine, P: ThreadPool>(engine: E, pool: P, addr: SocketAddr) -> Result<()> {
    let server = KvServer::bind(engine, pool, addr)?;
    println!("Server listening on {}", server.local_addr());
    server.run()
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
