//! Outbound protocol commands.
//!
//! The client only ever writes six kinds of line. Each is a [`Command`]
//! variant; its `Display` form is the wire text without terminator and
//! [`Command::to_line`] adds the trailing newline.

mod serialize;

pub use self::serialize::Redacted;

/// A line the client sends to the server.
/// `Debug` masks the credential of `PASS` the same way [`Command::redacted`] does.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS credential`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `JOIN channel`
    JOIN(String),
    /// `PRIVMSG channel contents`
    PRIVMSG(String, String),
    /// `PING`
    PING,
    /// `PONG`
    PONG,
}

impl Command {
    /// The protocol verb.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::JOIN(_) => "JOIN",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::PING => "PING",
            Command::PONG => "PONG",
        }
    }

    /// Wire form including the `\n` terminator.
    pub fn to_line(&self) -> String {
        let mut line = self.to_string();
        line.push('\n');
        line
    }

    /// A displayable form that masks the credential of a `PASS` line.
    ///
    /// Every other command displays unchanged.
    pub fn redacted(&self) -> Redacted<'_> {
        Redacted(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_line_terminates() {
        assert_eq!(Command::NICK("gravitybot".into()).to_line(), "NICK gravitybot\n");
        assert_eq!(Command::PING.to_line(), "PING\n");
        assert_eq!(Command::PONG.to_line(), "PONG\n");
    }

    #[test]
    fn test_names() {
        assert_eq!(Command::PASS("x".into()).name(), "PASS");
        assert_eq!(Command::PRIVMSG("#c".into(), "hi".into()).name(), "PRIVMSG");
    }
}
