//! # twitchline
//!
//! A minimal client core for line-oriented IRC-style chat servers, sized
//! for chat bots: dial a server, authenticate with `PASS`/`NICK`, join a
//! channel, and turn each received line into a [`Message`] for a
//! caller-supplied [`Handler`].
//!
//! ## Features
//!
//! - Redialable TCP [`Connection`] with line framing and keepalive
//! - [`Client`] handshake, `JOIN`, `PRIVMSG`, `PING` and `PONG` helpers
//! - A tolerant two-shape line parser that never fails
//! - Credential masking in every log line
//! - `.env`-style [`BotConfig`] loading
//!
//! Networking lives behind the default `tokio` feature; the parser,
//! command encoder and configuration loader work without it.
//!
//! ## Parsing Lines
//!
//! ```rust
//! use twitchline::Message;
//!
//! let msg = Message::parse(":alice!alice@alice.tmi.twitch.tv PRIVMSG #rust :hello", "mybot");
//! assert_eq!(msg.sender(), "alice");
//! assert_eq!(msg.command(), "PRIVMSG");
//! assert_eq!(msg.channel(), "#rust");
//! assert_eq!(msg.contents(), "hello");
//!
//! // Lines with no colon carry nothing the parser understands.
//! assert!(Message::parse("CAP REQ", "mybot").is_empty());
//! ```

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod util;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod connection;

pub use self::command::Command;
pub use self::config::BotConfig;
pub use self::error::{ClientError, ConfigError, ConnectionError};
pub use self::message::{Message, MessageRef};

#[cfg(feature = "tokio")]
pub use self::client::{Client, Dispatched, Handler};
#[cfg(feature = "tokio")]
pub use self::connection::Connection;
