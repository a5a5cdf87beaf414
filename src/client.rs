use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{KvError, Result};

/// `KvClient` holds one connection to a snapkv server and exchanges raw
/// protocol lines over it.
pub struct KvClient {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl KvClient {
    /// creates a client and establishes a socket connection to the server at
    /// the given `addr`
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<KvClient> {
        let tcp_reader = TcpStream::connect(addr)?;
        let tcp_writer = tcp_reader.try_clone()?;

        Ok(KvClient {
            reader: BufReader::new(tcp_reader),
            writer: BufWriter::new(tcp_writer),
        })
    }

    /// Sends one command line to the server and returns the reply line with
    /// its trailing newline stripped. `command` must be a single line.
    ///
    /// # Errors
    /// returns [`KvError::Disconnected`] if the server closed the connection
    /// before replying
    pub fn send(&mut self, command: &str) -> Result<String> {
        self.writer.write_all(command.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? == 0 {
            return Err(KvError::Disconnected);
        }
        Ok(reply.trim_end().to_string())
    }
}
