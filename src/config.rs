//! Bot configuration loaded from a `.env`-style file.
//!
//! The file holds one `KEY=VALUE` pair per line:
//!
//! ```text
//! # chat server
//! HOST=irc.chat.twitch.tv
//! PORT=6667
//! USER=gravitybot
//! export PASS="oauth:0123456789abcdef"
//! ```
//!
//! Blank lines and `#` comments are skipped, an `export ` prefix is
//! ignored, and values may be wrapped in single or double quotes. An
//! unquoted value ends at ` #`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, space0, space1},
    combinator::{opt, rest},
    error::{context, VerboseError},
    sequence::{delimited, terminated},
    IResult,
};

use crate::error::ConfigError;
use crate::util::redact;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Keys [`BotConfig::from_map`] requires.
pub const REQUIRED_KEYS: [&str; 4] = ["HOST", "PORT", "USER", "PASS"];

fn parse_key(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing key",
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'),
    )(input)
}

fn parse_quoted(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing quoted value",
        alt((
            delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
            delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        )),
    )(input)
}

fn parse_bare(input: &str) -> ParseResult<&str, &str> {
    let (remaining, value) = rest(input)?;
    let value = match value.find(" #") {
        Some(idx) => &value[..idx],
        None => value,
    };
    Ok((remaining, value.trim_end()))
}

/// Parse one `[export ]KEY = VALUE` entry.
fn parse_entry(input: &str) -> ParseResult<&str, (&str, &str)> {
    let (input, _) = opt(terminated(tag("export"), space1))(input)?;
    let (input, key) = parse_key(input)?;
    let (input, _) = context("parsing separator", delimited(space0, char('='), space0))(input)?;
    let (input, value) = alt((parse_quoted, parse_bare))(input)?;
    Ok((input, (key, value)))
}

/// Parses the contents of an env file.
///
/// Later occurrences of a key replace earlier ones.
pub fn parse_env(contents: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut env = BTreeMap::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || ConfigError::Malformed {
            line: idx + 1,
            content: raw.to_string(),
        };

        let (remaining, (key, value)) = parse_entry(line).map_err(|_| malformed())?;
        let remaining = remaining.trim();
        if !remaining.is_empty() && !remaining.starts_with('#') {
            return Err(malformed());
        }

        env.insert(key.to_string(), value.to_string());
    }

    Ok(env)
}

/// Reads and parses an env file.
pub fn read_env_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_env(&contents)
}

/// Fails with [`ConfigError::MissingKey`] for the first key not in `env`.
pub fn validate(env: &BTreeMap<String, String>, required: &[&str]) -> Result<(), ConfigError> {
    match required.iter().find(|key| !env.contains_key(**key)) {
        Some(key) => Err(ConfigError::MissingKey((*key).to_string())),
        None => Ok(()),
    }
}

/// Connection and identity settings for one bot.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotConfig {
    /// Chat server host name.
    pub host: String,
    /// Chat server port.
    pub port: u16,
    /// Nickname to authenticate as.
    pub username: String,
    /// Credential sent with `PASS`, typically an OAuth token.
    pub password: String,
}

impl BotConfig {
    /// Loads `HOST`, `PORT`, `USER` and `PASS` from an env file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_map(&read_env_file(path)?)
    }

    /// Builds a config from already-parsed key/value pairs.
    pub fn from_map(env: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        validate(env, &REQUIRED_KEYS)?;

        let port = &env["PORT"];
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        Ok(Self {
            host: env["HOST"].clone(),
            port,
            username: env["USER"].clone(),
            password: env["PASS"].clone(),
        })
    }

    /// `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// A disconnected [`Connection`](crate::Connection) to the configured server.
    #[cfg(feature = "tokio")]
    pub fn connection(&self) -> crate::Connection {
        crate::Connection::new(self.host.clone(), self.port)
    }

    /// A [`Client`](crate::Client) owning a fresh, disconnected connection.
    #[cfg(feature = "tokio")]
    pub fn into_client(self) -> crate::Client {
        let connection = self.connection();
        crate::Client::new(self.username, self.password, connection)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}
