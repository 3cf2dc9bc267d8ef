//! Authenticated chat client on top of a [`Connection`].
//!
//! # Example
//!
//! ```no_run
//! use twitchline::{Client, ClientError, Connection, Handler, Message};
//!
//! struct Pong;
//!
//! impl Handler for Pong {
//!     async fn handle(&mut self, client: &mut Client, message: &Message) -> Result<(), ClientError> {
//!         match message.command() {
//!             "PING" => client.pong().await,
//!             _ => Ok(()),
//!         }
//!     }
//! }
//!
//! # async fn run() -> Result<(), ClientError> {
//! let connection = Connection::new("irc.chat.twitch.tv", 6667);
//! let mut client = Client::new("gravitybot", "oauth:0123456789", connection);
//!
//! client.connect(true).await?;
//! client.join_channel("#gravitybot").await?;
//!
//! loop {
//!     client.receive_and_dispatch(&mut Pong).await?.into_result()?;
//! }
//! # }
//! ```

use tracing::{debug, error, info};

use crate::command::Command;
use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::message::Message;

/// Reacts to each received message.
///
/// The handler gets mutable access to the client so it can answer, e.g.
/// with [`Client::pong`]. Its error becomes the outcome of the
/// [`Client::receive_and_dispatch`] call that invoked it.
#[allow(async_fn_in_trait)]
pub trait Handler {
    async fn handle(&mut self, client: &mut Client, message: &Message) -> Result<()>;
}

/// A received message together with what its handler returned.
#[derive(Debug)]
#[must_use = "the handler outcome may carry an error"]
pub struct Dispatched {
    pub message: Message,
    pub outcome: Result<()>,
}

impl Dispatched {
    /// The message if the handler succeeded, otherwise the handler's error.
    pub fn into_result(self) -> Result<Message> {
        self.outcome.map(|()| self.message)
    }
}

/// A chat client: identity plus one exclusively owned connection.
pub struct Client {
    username: String,
    password: String,
    connection: Connection,
}

impl Client {
    /// The connection may already be dialed; it is used as is.
    pub fn new(username: impl Into<String>, password: impl Into<String>, connection: Connection) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            connection,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Releases the connection, consuming the client.
    pub fn into_connection(self) -> Connection {
        self.connection
    }

    /// Dials the server and authenticates.
    ///
    /// A dial failure is returned before any handshake line is sent.
    pub async fn connect(&mut self, verbose: bool) -> Result<()> {
        if verbose {
            info!(endpoint = %self.connection, "dialing");
        }

        match self.connection.dial().await {
            Ok(peer) => {
                if verbose {
                    info!(endpoint = %self.connection, %peer, "connected");
                }
            }
            Err(e) => {
                if verbose {
                    error!(endpoint = %self.connection, "dial failed: {}", e);
                }
                return Err(e.into());
            }
        }

        self.authenticate(verbose).await
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        self.connection.disconnect().await?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Sends `PASS <credential>` then `NICK <username>`.
    ///
    /// Requires an open connection and performs no I/O otherwise. A failed
    /// send stops the handshake where it is; nothing is rolled back. The
    /// credential is masked in every log line.
    pub async fn authenticate(&mut self, verbose: bool) -> Result<()> {
        if !self.connection.is_connected() {
            return Err(ClientError::Unauthenticated {
                endpoint: self.connection.endpoint(),
            });
        }

        self.send_command(&Command::PASS(self.password.clone()), verbose)
            .await?;
        self.send_command(&Command::NICK(self.username.clone()), verbose)
            .await?;

        if verbose {
            info!(username = %self.username, "authenticated");
        }
        Ok(())
    }

    /// Sends `JOIN <channel>`. The channel prefix (e.g. `#`) is the caller's job.
    pub async fn join_channel(&mut self, channel: &str) -> Result<()> {
        self.send_command(&Command::JOIN(channel.to_string()), false)
            .await
    }

    /// Sends `PRIVMSG <channel> <contents>`.
    pub async fn send_message(&mut self, contents: &str, channel: &str) -> Result<()> {
        self.send_command(
            &Command::PRIVMSG(channel.to_string(), contents.to_string()),
            false,
        )
        .await
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.send_command(&Command::PING, false).await
    }

    pub async fn pong(&mut self) -> Result<()> {
        self.send_command(&Command::PONG, false).await
    }

    async fn send_command(&mut self, command: &Command, verbose: bool) -> Result<()> {
        if verbose {
            info!(command = %command.redacted(), "sending");
        } else {
            debug!(command = %command.redacted(), "sending");
        }

        if let Err(e) = self.connection.send(&command.to_line()).await {
            if verbose {
                error!(command = command.name(), "send failed: {}", e);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Reads one line, parses it, and hands it to `handler`.
    ///
    /// Fails without reading when disconnected. A read error is returned
    /// directly and the handler is not called. Otherwise the parsed message
    /// and the handler's result are returned together; unparseable lines
    /// arrive as an empty [`Message`].
    pub async fn receive_and_dispatch<H: Handler>(&mut self, handler: &mut H) -> Result<Dispatched> {
        if !self.connection.is_connected() {
            return Err(ClientError::Unconnected {
                endpoint: self.connection.endpoint(),
            });
        }

        let line = self.connection.read_line().await?;
        let message = Message::parse(&line, &self.username);
        let outcome = handler.handle(self, &message).await;

        Ok(Dispatched { message, outcome })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("username", &self.username)
            .field("password", &crate::util::redact(&self.password))
            .field("connection", &self.connection)
            .finish()
    }
}
