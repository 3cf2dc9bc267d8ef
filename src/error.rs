//! Error types for the chat client.
//!
//! Transport failures, state-precondition failures, and configuration
//! failures each get their own enum. Unparseable protocol lines are not
//! errors at all; they produce an empty [`Message`](crate::Message).

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors raised by a [`Connection`](crate::Connection).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    /// I/O error while dialing, reading, or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A send was attempted while no stream is open.
    #[error("cannot send message {message:?} on disconnected stream {endpoint}")]
    Disconnected {
        /// The line that was not sent.
        message: String,
        /// `host:port` of the connection.
        endpoint: String,
    },

    /// A read was attempted while no stream is open.
    #[error("cannot read from disconnected stream {endpoint}")]
    NotConnected {
        /// `host:port` of the connection.
        endpoint: String,
    },

    /// The remote peer closed the stream.
    #[error("end of stream from {endpoint}")]
    Eof {
        /// `host:port` of the connection.
        endpoint: String,
    },

    /// An inbound line exceeded the maximum line length.
    #[error("line exceeded {limit} bytes")]
    LineTooLong {
        /// The configured limit.
        limit: usize,
    },
}

impl ConnectionError {
    /// Returns true if the peer closed the stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof { .. })
    }
}

/// Errors raised by a [`Client`](crate::Client).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Transport failure, surfaced verbatim.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Authentication attempted before the connection was dialed.
    #[error("cannot authenticate unauthenticated stream {endpoint}: not connected")]
    Unauthenticated {
        /// `host:port` of the connection.
        endpoint: String,
    },

    /// Receive attempted before the connection was dialed.
    #[error("unconnected stream {endpoint}, cannot parse")]
    Unconnected {
        /// `host:port` of the connection.
        endpoint: String,
    },

    /// Error returned by a message handler.
    #[error("handler error: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Wraps any error produced inside a handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Handler(err.into())
    }

    /// Returns true if this error is the peer closing the stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Connection(e) if e.is_eof())
    }
}

/// Errors raised while loading bot configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the configuration file is not `KEY=VALUE`.
    #[error("malformed line {line}: {content:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// A required key is absent.
    #[error("missing env variable: {0}")]
    MissingKey(String),

    /// The port is not a 16-bit unsigned integer.
    #[error("invalid port number: {0}")]
    InvalidPort(String),
}
