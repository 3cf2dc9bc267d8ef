use std::fmt::{self, Write};

use crate::util::redact;

use super::Command;

/// Write a command followed by its arguments, each preceded by one space.
///
/// Arguments are written verbatim; no `:` is inserted.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    for arg in args {
        f.write_char(' ')?;
        f.write_str(arg)?;
    }
    Ok(())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(credential) => write_cmd(f, "PASS", &[credential.as_str()]),
            Command::NICK(nick) => write_cmd(f, "NICK", &[nick.as_str()]),
            Command::JOIN(channel) => write_cmd(f, "JOIN", &[channel.as_str()]),
            Command::PRIVMSG(channel, contents) => {
                write_cmd(f, "PRIVMSG", &[channel.as_str(), contents.as_str()])
            }
            Command::PING => f.write_str("PING"),
            Command::PONG => f.write_str("PONG"),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(credential) => f.debug_tuple("PASS").field(&redact(credential)).finish(),
            Command::NICK(nick) => f.debug_tuple("NICK").field(nick).finish(),
            Command::JOIN(channel) => f.debug_tuple("JOIN").field(channel).finish(),
            Command::PRIVMSG(channel, contents) => {
                f.debug_tuple("PRIVMSG").field(channel).field(contents).finish()
            }
            Command::PING => f.write_str("PING"),
            Command::PONG => f.write_str("PONG"),
        }
    }
}

/// Display adapter returned by [`Command::redacted`].
#[derive(Clone, Copy, Debug)]
pub struct Redacted<'a>(pub(super) &'a Command);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Command::PASS(credential) => write_cmd(f, "PASS", &[redact(credential).as_str()]),
            other => fmt::Display::fmt(other, f),
        }
    }
}
