use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::command::{Request, Response};
use crate::engine::KvEngine;
use crate::thread_pool::ThreadPool;
use crate::Result;

// upper bound on the bytes consumed from a client by a single read
const MAX_LINE_BYTES: u64 = 1024;

/// A TCP socket server exposing a [`KvEngine`] over the line protocol.
///
/// The accept loop hands every incoming connection to the [`ThreadPool`], so
/// accepting never blocks on client processing. Each connection gets a clone
/// of the engine and runs its own read-parse-dispatch-reply loop until the
/// client disconnects.
pub struct KvServer<E: KvEngine, P: ThreadPool> {
    /// the storage engine handles given to connection threads
    engine: E,
    /// pool that runs one job per accepted connection
    pool: P,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
}

/// Stops a running [`KvServer`] from another thread.
///
/// Obtained from [`KvServer::shutdown_handle`] before the server is run.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signals the server to stop accepting connections and release its
    /// listener. Connections already being served are not drained; they end
    /// whenever their clients disconnect.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // the accept loop only observes the flag after accept returns, so
        // poke it awake with a throwaway connection
        let _ = TcpStream::connect(self.addr);
    }
}

impl<E: KvEngine, P: ThreadPool> KvServer<E, P> {
    /// Binds a listener on `addr` using the given engine and thread pool.
    ///
    /// # Errors
    /// returns [`KvError::Io`](crate::KvError::Io) if the address cannot be
    /// bound
    pub fn bind<A: ToSocketAddrs>(engine: E, pool: P, addr: A) -> Result<KvServer<E, P>> {
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;
        info!("listening on {}", local_addr);

        Ok(KvServer {
            engine,
            pool,
            listener,
            local_addr,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// the address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// returns a handle that can stop this server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: Arc::clone(&self.shutdown),
            addr: self.local_addr,
        }
    }

    /// Accepts connections until the shutdown handle fires, servicing each
    /// one on the thread pool. A connection that fails to be accepted or
    /// serviced is logged and never takes the server down.
    pub fn run(self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            match stream {
                Ok(stream) => {
                    let engine = self.engine.clone();
                    self.pool.spawn(move || {
                        if let Err(e) = serve(engine, stream) {
                            error!("error on serving client: {}", e);
                        }
                    });
                }
                Err(e) => error!("connection failed: {}", e),
            }
        }
        info!("server stopped");
        Ok(())
    }
}

/// One connection's command loop: read a line, dispatch it to the engine,
/// write the reply line back. Returns when the client disconnects; the
/// stream is released on every exit path by drop.
fn serve<E: KvEngine>(engine: E, stream: TcpStream) -> Result<()> {
    let peer_addr = stream.peer_addr()?;
    debug!("client connected: {}", peer_addr);

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        // a fresh `take` caps every read at MAX_LINE_BYTES
        if (&mut reader).take(MAX_LINE_BYTES).read_line(&mut line)? == 0 {
            break; // client disconnected
        }

        let response = dispatch(&engine, line.trim());
        debug!("request from {}: {:?} -> {}", peer_addr, line.trim(), response);

        writer.write_all(response.to_string().as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    debug!("client disconnected: {}", peer_addr);
    Ok(())
}

/// The protocol handler: a pure request-line-to-reply mapping over the
/// engine. Malformed lines never reach the engine; engine failures are
/// logged and reported to the client as `ERROR:` replies.
fn dispatch<E: KvEngine>(engine: &E, line: &str) -> Response {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(e) => return Response::Error(e.to_string()),
    };

    let result = match request {
        Request::Set { key, value } => engine.set(key, value).map(|()| Response::Ok),
        Request::Get { key } => engine.get(&key).map(|value| match value {
            Some(value) => Response::Value(value),
            None => Response::Null,
        }),
        Request::Del { key } => engine.delete(&key).map(|existed| {
            if existed {
                Response::Ok
            } else {
                Response::Null
            }
        }),
    };

    result.unwrap_or_else(|e| {
        error!("store operation failed: {}", e);
        Response::Error(e.to_string())
    })
}
