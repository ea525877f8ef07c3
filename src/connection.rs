use std::fmt;

use log::{debug, info, trace};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use crate::{
    codec::PacketRegistry,
    error::RconError,
    id::{IdSource, RandomIds},
    packet::Packet,
    reassembler::Reassembler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closed,
}

/// A TCP connection to an rcon server.
///
/// Each [Connection::read] does exactly one socket read; bytes that do not
/// yet make up a whole packet are kept until the next call.
///
/// ## Example
/// ```no_run
/// use srcrcon::{auth::authenticate, connection::Connection};
/// use std::error::Error;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let mut conn = Connection::new("127.0.0.1", 27015);
///     conn.connect().await?;
///     let conn = authenticate("<put rcon password here>", conn).await?;
///     assert!(conn.is_authenticated());
///     Ok(())
/// }
/// ```
pub struct Connection {
    host: String,
    port: u16,
    state: ConnectionState,
    authenticated: bool,
    stream: Option<TcpStream>,
    reassembler: Reassembler,
    ids: Box<dyn IdSource>,
}

impl Connection {
    /// Upper bound for a single socket read.
    pub const READ_CHUNK_SIZE: usize = 1024;

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Connection {
            host: host.into(),
            port,
            state: ConnectionState::Disconnected,
            authenticated: false,
            stream: None,
            reassembler: Reassembler::new(PacketRegistry::responses()),
            ids: Box::new(RandomIds),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_registry(mut self, registry: PacketRegistry) -> Self {
        self.reassembler = Reassembler::new(registry);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True until the stream is closed by either side.
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub(crate) fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    /// Id for the next request packet.
    pub fn next_id(&mut self) -> i32 {
        self.ids.next_id()
    }

    /// Open a fresh stream. Any previous stream is dropped and the
    /// connection has to authenticate again.
    pub async fn connect(&mut self) -> Result<(), RconError> {
        self.stream = None;
        self.authenticated = false;
        self.state = ConnectionState::Connecting;

        let stream = match TcpStream::connect((self.host.as_str(), self.port)).await {
            Ok(stream) => stream,
            Err(source) => {
                self.state = ConnectionState::Disconnected;
                return Err(RconError::ConnectionFailure {
                    host: self.host.clone(),
                    port: self.port,
                    source,
                });
            }
        };

        info!("Successfully connected to ({}, {})", self.host, self.port);
        self.stream = Some(stream);
        self.reassembler.clear();
        self.state = ConnectionState::Open;
        Ok(())
    }

    /// Close the stream. Calling this more than once is fine.
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            info!("Disconnected from ({}, {})", self.host, self.port);
        }
        self.authenticated = false;
        if self.state != ConnectionState::Disconnected {
            self.state = ConnectionState::Closed;
        }
    }

    pub async fn send(&mut self, packet: &Packet) -> Result<(), RconError> {
        let payload = packet.pack()?;
        let stream = self.open_stream()?;

        stream
            .write_all(&payload)
            .await
            .map_err(RconError::SendError)?;
        stream.flush().await.map_err(RconError::SendError)?;

        debug!("wrote {}", packet);
        Ok(())
    }

    /// Read once from the socket and return a packet if one is complete.
    /// `None` means the caller has to read again, or that the server closed
    /// the connection.
    ///
    /// A packet that is already sitting whole in the buffer is returned
    /// without touching the socket.
    pub async fn read(&mut self) -> Result<Option<Packet>, RconError> {
        let mut buf = [0u8; Self::READ_CHUNK_SIZE];
        self.open_stream()?;

        if let Some(packet) = self.reassembler.next_packet()? {
            return Ok(Some(packet));
        }

        let stream = self.open_stream()?;

        let n = stream
            .read(&mut buf)
            .await
            .map_err(RconError::ReceiveError)?;
        trace!("read {} bytes", n);

        if n == 0 {
            self.on_close();
        }

        let packet = self.reassembler.push(&buf[..n])?;
        if packet.is_none() {
            trace!("{} bytes buffered, no complete packet yet", self.reassembler.buffered());
        }
        Ok(packet)
    }

    fn open_stream(&mut self) -> Result<&mut TcpStream, RconError> {
        if self.state != ConnectionState::Open {
            return Err(RconError::NotOpen);
        }
        self.stream.as_mut().ok_or(RconError::NotOpen)
    }

    fn on_close(&mut self) {
        info!("Connection to ({}, {}) closed", self.host, self.port);
        self.stream = None;
        self.authenticated = false;
        self.state = ConnectionState::Closed;
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("state", &self.state)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}
