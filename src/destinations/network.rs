//! TCP destination for remote streams
//!
//! Carries newline-delimited records to a collector. There is no
//! reconnection and no retry: a broken connection surfaces as a write error
//! to the sink, which keeps the unsent bytes buffered.

use crate::core::{Destination, LoggerError, Result};
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Connect and write timeout for remote streams
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination that writes to a connected TCP stream
///
/// # Example
///
/// ```no_run
/// use rust_telemetry_logger::destinations::NetworkDestination;
///
/// let destination = NetworkDestination::connect("127.0.0.1:9000")
///     .expect("collector is not listening");
/// ```
pub struct NetworkDestination {
    stream: TcpStream,
    name: String,
}

impl NetworkDestination {
    /// Connect to `address` (host:port)
    ///
    /// # Errors
    ///
    /// `DestinationUnavailable` when the address does not resolve or no
    /// resolved address accepts the connection within the timeout.
    pub fn connect(address: &str) -> Result<Self> {
        let addrs: Vec<SocketAddr> = address
            .to_socket_addrs()
            .map_err(|e| LoggerError::unavailable(address, e.to_string()))?
            .collect();

        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, NETWORK_TIMEOUT) {
                Ok(stream) => return Self::from_stream(stream, address),
                Err(e) => last_err = Some(e),
            }
        }

        let message = match last_err {
            Some(e) => e.to_string(),
            None => "address resolved to nothing".to_string(),
        };
        Err(LoggerError::unavailable(address, message))
    }

    fn from_stream(stream: TcpStream, address: &str) -> Result<Self> {
        // Set timeouts to prevent hanging
        stream.set_write_timeout(Some(NETWORK_TIMEOUT))?;
        stream.set_read_timeout(Some(NETWORK_TIMEOUT))?;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            name: format!("tcp://{}", address),
        })
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

impl Destination for NetworkDestination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
