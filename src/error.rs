use thiserror::Error;
use tokio::time::error::Elapsed;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned when encoding a packet that has no type set.
    #[error("missing packet type")]
    MissingPacketType,
    /// Returned when a body is too long for the size field to describe.
    #[error("packet body too large ({0} bytes)")]
    PacketTooLarge(usize),
    /// Returned if we received a packet that does not have a type known to us.
    #[error("unknown rcon packet type: {0}")]
    UnknownPacketType(i32),
    /// Returned if a frame is too short to hold an id, a type and the
    /// terminator, or its size field is negative or over the packet maximum.
    #[error("packet frame malformed ({0} bytes)")]
    MalformedFrame(i32),
    /// Returned if the body is mangled in some way.
    #[error("packet body malformed (not valid utf-8)")]
    MalformedPacketBody(#[from] std::string::FromUtf8Error),
    /// Returned if the host is down or behind a firewall.
    #[error("cannot connect to ({host}, {port})")]
    ConnectionFailure {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    /// Internal error used if the stream was successfully established, but
    /// there was a problem writing to the socket.
    #[error("cannot send message to host")]
    SendError(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from the socket.
    #[error("cannot receive response from host")]
    ReceiveError(#[source] std::io::Error),
    /// Returned if `send` or `read` is called on a connection that is not open.
    #[error("connection is not open")]
    NotOpen,
    /// Returned if you can't remember the password.
    #[error("authentication failed")]
    AuthenticationFailure,
    /// Returned when a command is issued over a connection that never
    /// authenticated.
    #[error("connection is not authenticated")]
    NotAuthenticated,
    /// Returned if a command is empty or its template has unfilled arguments.
    #[error("{0}")]
    InvalidCommand(&'static str),
    /// Returned when the server did not answer a command the way we expected.
    #[error("command {command:?} failed")]
    CommandExecutionFailure { command: String },
    /// Returned if the server did not respond in time.
    #[error("timeout")]
    TimeoutError(#[from] Elapsed),
}

impl RconError {
    /// True for the errors that mean the bytes on the wire could not be
    /// turned into a packet.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            RconError::UnknownPacketType(_)
                | RconError::MalformedFrame(_)
                | RconError::MalformedPacketBody(_)
        )
    }
}
