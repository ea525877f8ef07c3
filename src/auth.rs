use log::{error, info, trace};

use crate::{
    connection::Connection,
    error::RconError,
    packet::{Packet, PacketType},
};

/// Authenticates a [Connection] with one auth round trip.
pub struct Authenticator {
    password: String,
    authenticated: bool,
}

impl Authenticator {
    pub fn new(password: impl Into<String>) -> Self {
        Authenticator {
            password: password.into(),
            authenticated: false,
        }
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Send the password and read a single reply. The server accepted it
    /// only if the reply is an auth response carrying our id; it answers a
    /// bad password with id `-1`, which is just another mismatch here.
    pub async fn authenticate(&mut self, conn: &mut Connection) -> Result<(), RconError> {
        let request = Packet::auth(conn.next_id(), &self.password);

        trace!("sending auth packet {} to server", request.id());
        conn.send(&request).await?;
        let response = conn.read().await?;

        match response {
            Some(packet) if packet.is(PacketType::AuthResponse) && packet.id() == request.id() => {
                self.authenticated = true;
                conn.set_authenticated(true);
                info!("Authentication successful");
                Ok(())
            }
            other => {
                if let Some(packet) = other {
                    trace!("unexpected auth reply {}", packet);
                }
                self.authenticated = false;
                conn.set_authenticated(false);
                error!("Authentication failed");
                Err(RconError::AuthenticationFailure)
            }
        }
    }
}

/// Authenticate `conn` with `password` and hand it back. On failure the
/// connection is disconnected before the error is returned.
pub async fn authenticate(password: &str, mut conn: Connection) -> Result<Connection, RconError> {
    let mut authenticator = Authenticator::new(password);
    match authenticator.authenticate(&mut conn).await {
        Ok(()) => Ok(conn),
        Err(e) => {
            conn.disconnect();
            Err(e)
        }
    }
}
