use std::fmt;

use log::{error, trace};

use crate::{
    connection::Connection,
    error::RconError,
    notify::Notifier,
    packet::{Packet, PacketType},
};

const COMMAND_TEXT: &str = "{command_text}";
const RESPONSE: &str = "{response}";

/// A command to run on the server, along with the messages shown when it
/// succeeds or fails.
///
/// The success and failure templates may contain `{command_text}`; the
/// response template may contain `{response}`. An optional validator gets
/// the last word on whether a reply counts as success.
#[derive(Debug, Clone)]
pub struct Command {
    text: String,
    success_fmt: String,
    failure_fmt: String,
    response_fmt: String,
    validator: Option<fn(&str) -> bool>,
}

impl Command {
    pub const DEFAULT_SUCCESS_FMT: &'static str = "'{command_text}' succeeded.";
    pub const DEFAULT_FAILURE_FMT: &'static str = "'{command_text}' failed!";
    pub const DEFAULT_RESPONSE_FMT: &'static str = "{response}";

    pub fn new(text: impl Into<String>) -> Result<Self, RconError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RconError::InvalidCommand("Expected a command string"));
        }

        Ok(Command {
            text,
            success_fmt: Self::DEFAULT_SUCCESS_FMT.to_owned(),
            failure_fmt: Self::DEFAULT_FAILURE_FMT.to_owned(),
            response_fmt: Self::DEFAULT_RESPONSE_FMT.to_owned(),
            validator: None,
        })
    }

    /// Build the command text by filling `{name}` tokens in `fmt`, e.g.
    /// `SayToPlayer {player_name} {message}`. Every token has to be filled.
    pub fn from_template(fmt: &str, args: &[(&str, &str)]) -> Result<Self, RconError> {
        let mut text = String::with_capacity(fmt.len());
        let mut rest = fmt;

        while let Some(open) = rest.find('{') {
            text.push_str(&rest[..open]);
            let close = rest[open..]
                .find('}')
                .ok_or(RconError::InvalidCommand("Unterminated command argument"))?;
            let name = &rest[open + 1..open + close];
            let (_, value) = args
                .iter()
                .find(|(arg, _)| *arg == name)
                .ok_or(RconError::InvalidCommand("Missing command argument"))?;
            text.push_str(value);
            rest = &rest[open + close + 1..];
        }
        text.push_str(rest);

        Self::new(text)
    }

    pub fn with_validator(mut self, validator: fn(&str) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_success_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.success_fmt = fmt.into();
        self
    }

    pub fn with_failure_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.failure_fmt = fmt.into();
        self
    }

    pub fn with_response_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.response_fmt = fmt.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn success(&self) -> String {
        self.success_fmt.replace(COMMAND_TEXT, &self.text)
    }

    pub fn failure(&self) -> String {
        self.failure_fmt.replace(COMMAND_TEXT, &self.text)
    }

    pub fn response(&self, response: &str) -> String {
        self.response_fmt.replace(RESPONSE, response)
    }

    pub fn validate(&self, response: &str) -> bool {
        self.validator.map_or(true, |validate| validate(response))
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.success_fmt == other.success_fmt
            && self.failure_fmt == other.failure_fmt
            && self.response_fmt == other.response_fmt
    }
}

impl Eq for Command {}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What the server said back to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    id: i32,
    body: String,
}

impl Response {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }
}

/// Run `command` over an authenticated connection.
///
/// Exactly one request is sent and one read is made; the reply must be a
/// response value carrying the request id that the command's validator
/// accepts. Success and failure are both
/// reported through `notifier`.
pub async fn execute(
    command: &Command,
    conn: &mut Connection,
    notifier: &mut dyn Notifier,
) -> Result<Response, RconError> {
    if !conn.is_open() {
        return Err(RconError::NotOpen);
    }
    if !conn.is_authenticated() {
        return Err(RconError::NotAuthenticated);
    }

    let request = Packet::exec_command(conn.next_id(), command.text());
    trace!("sending command packet {} to server", request.id());
    conn.send(&request).await?;
    let reply = conn.read().await?;

    match reply {
        Some(packet)
            if packet.is(PacketType::ResponseValue)
                && packet.id() == request.id()
                && command.validate(packet.body()) =>
        {
            trace!("receive response for packet id {}", packet.id());
            let response = Response {
                id: packet.id(),
                body: packet.into_body(),
            };
            notifier.notify(&command.success());
            notifier.notify(&command.response(response.body()));
            Ok(response)
        }
        other => {
            match other {
                Some(packet) => error!("unexpected reply {} to command {}", packet, request.id()),
                None => error!("no reply to command {}", request.id()),
            }
            notifier.notify(&command.failure());
            Err(RconError::CommandExecutionFailure {
                command: command.text().to_owned(),
            })
        }
    }
}
