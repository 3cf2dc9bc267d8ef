//! Parsed protocol lines.
//!
//! [`MessageRef`] is the zero-copy parse result; [`Message`] is the owned
//! value handed to handlers.

mod borrowed;

pub use self::borrowed::MessageRef;

use std::fmt;

/// A received protocol line broken into its four recognised fields.
///
/// No field is ever absent: missing parts are empty strings. A `Message`
/// is immutable once built; the fields are exposed through accessors only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    sender: String,
    command: String,
    channel: String,
    contents: String,
}

impl Message {
    /// Builds a message from its fields.
    pub fn new(
        sender: impl Into<String>,
        command: impl Into<String>,
        channel: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            command: command.into(),
            channel: channel.into(),
            contents: contents.into(),
        }
    }

    /// Parses a raw line. See [`MessageRef::parse`] for the grammar.
    ///
    /// ```
    /// use twitchline::Message;
    ///
    /// let msg = Message::parse(":alice!alice@host PRIVMSG #rust :hi", "mybot");
    /// assert_eq!(msg.sender(), "alice");
    /// assert_eq!(msg.channel(), "#rust");
    /// assert_eq!(msg.contents(), "hi");
    ///
    /// let ping = Message::parse("PING :tmi.twitch.tv", "mybot");
    /// assert_eq!(ping.command(), "PING");
    /// assert_eq!(ping.contents(), "tmi.twitch.tv");
    /// ```
    pub fn parse(line: &str, own_nick: &str) -> Self {
        MessageRef::parse(line, own_nick).to_message()
    }

    /// Nickname of the sender, or empty for server lines.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Protocol verb such as `PING`, `PRIVMSG` or `JOIN`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Target channel, empty when absent or addressed to the client itself.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Payload text.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Returns true if no field was recognised.
    pub fn is_empty(&self) -> bool {
        self.borrowed().is_empty()
    }

    /// Borrows the fields as a [`MessageRef`].
    pub fn borrowed(&self) -> MessageRef<'_> {
        MessageRef {
            sender: &self.sender,
            command: &self.command,
            channel: &self.channel,
            contents: &self.contents,
        }
    }
}

impl<'a> From<MessageRef<'a>> for Message {
    fn from(msg: MessageRef<'a>) -> Self {
        msg.to_message()
    }
}

/// Formats the message in the prefixed line shape, e.g.
/// `:alice!alice PRIVMSG #rust :hi`.
///
/// Re-parsing the output recovers every field as long as none of them
/// contains a `:`, and sender, command and channel contain no spaces.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{0}!{0} {1} {2} :{3}",
            self.sender, self.command, self.channel, self.contents
        )
    }
}
