use std::{future::Future, time::Duration};

use log::trace;

use crate::{
    auth::Authenticator,
    command::{execute, Command, Response},
    connection::Connection,
    error::RconError,
    notify::Notifier,
};

/// Where to connect and how to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    /// Upper bound for connecting and for each request/response round trip.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub const DEFAULT_PORT: u16 = 27015;

    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        ClientConfig {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            password: password.into(),
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An authenticated session. Commands run one at a time.
///
/// ## Example
/// ```no_run
/// use srcrcon::client::{Client, ClientConfig};
/// use srcrcon::notify::ConsoleNotifier;
/// use std::{error::Error, time::Duration};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let config = ClientConfig::new("127.0.0.1", "<put rcon password here>")
///         .with_timeout(Duration::from_secs(5));
///     let mut client = Client::connect(&config).await?;
///     let response = client.command("echo hi", &mut ConsoleNotifier).await?;
///
///     assert_eq!(response.body(), "hi");
///     client.close();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    conn: Connection,
    timeout: Option<Duration>,
}

impl Client {
    pub async fn connect(config: &ClientConfig) -> Result<Self, RconError> {
        Self::connect_with(Connection::new(config.host.clone(), config.port), config).await
    }

    /// Same as [Client::connect], on a connection the caller set up (for
    /// example with its own id source).
    pub async fn connect_with(
        mut conn: Connection,
        config: &ClientConfig,
    ) -> Result<Self, RconError> {
        within(config.timeout, conn.connect()).await?;
        trace!("opened tcp stream to {}:{}, attempting auth", config.host, config.port);

        let mut authenticator = Authenticator::new(config.password.clone());
        if let Err(e) = within(config.timeout, authenticator.authenticate(&mut conn)).await {
            conn.disconnect();
            return Err(e);
        }
        trace!("auth complete");

        Ok(Client {
            conn,
            timeout: config.timeout,
        })
    }

    pub async fn command(
        &mut self,
        command: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<Response, RconError> {
        let command = Command::new(command)?;
        self.run(&command, notifier).await
    }

    pub async fn run(
        &mut self,
        command: &Command,
        notifier: &mut dyn Notifier,
    ) -> Result<Response, RconError> {
        let result = within(self.timeout, execute(command, &mut self.conn, notifier)).await;
        if let Err(RconError::TimeoutError(_)) = result {
            // a late reply would be taken for the answer to the next command
            self.conn.disconnect();
        }
        result
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(mut self) {
        self.conn.disconnect();
    }
}

/// Connect, authenticate, run one command and disconnect, whatever happens
/// along the way.
pub async fn single_command(
    config: &ClientConfig,
    command: &str,
    notifier: &mut dyn Notifier,
) -> Result<Response, RconError> {
    let command = Command::new(command)?;
    let mut client = Client::connect(config).await?;
    let result = client.run(&command, notifier).await;
    client.close();
    result
}

async fn within<T, F>(timeout: Option<Duration>, fut: F) -> Result<T, RconError>
where
    F: Future<Output = Result<T, RconError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await?,
        None => fut.await,
    }
}
