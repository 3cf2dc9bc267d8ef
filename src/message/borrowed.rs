use super::Message;

/// A parsed protocol line borrowing from the raw input.
///
/// Every field is a slice of the line that was parsed; absent fields are
/// empty slices. Use [`MessageRef::to_message`] to detach it from the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageRef<'a> {
    pub sender: &'a str,
    pub command: &'a str,
    pub channel: &'a str,
    pub contents: &'a str,
}

impl<'a> MessageRef<'a> {
    /// Parses one protocol line with its terminator already stripped.
    ///
    /// Two line shapes are recognised:
    ///
    /// ```text
    /// COMMAND :contents                         (no sender prefix)
    /// :nick!user@host COMMAND target :contents  (prefixed event)
    /// ```
    ///
    /// The line is split on every `:`. Text before the first colon that is
    /// not blank selects the first shape. Otherwise the segment after the
    /// first colon is split on spaces into sender, command and target, and
    /// the segment after the second colon becomes the contents.
    ///
    /// A target equal to `own_nick` (both trimmed) is a line addressed to
    /// the client itself and leaves `channel` empty.
    ///
    /// Parsing never fails: a line without any colon yields an empty
    /// message, as do prefixes with fewer than three space-separated fields
    /// (contents may still be filled in that case).
    pub fn parse(line: &'a str, own_nick: &str) -> Self {
        let mut parts = line.split(':');
        let head = parts.next().unwrap_or_default().trim();
        let Some(prefix) = parts.next() else {
            return Self::default();
        };

        if !head.is_empty() {
            return Self {
                command: head,
                contents: prefix,
                ..Self::default()
            };
        }

        let mut msg = Self::default();

        let fields: Vec<&str> = prefix.split(' ').collect();
        if let &[source, command, target, ..] = fields.as_slice() {
            if let Some((nick, _)) = source.split_once('!') {
                msg.sender = nick;
            }
            msg.command = command;

            let target = target.trim();
            if target != own_nick.trim() {
                msg.channel = target;
            }
        }

        if let Some(payload) = parts.next() {
            msg.contents = payload;
        }

        msg
    }

    /// Returns true if no field was recognised.
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
            && self.command.is_empty()
            && self.channel.is_empty()
            && self.contents.is_empty()
    }

    /// Copies the borrowed fields into an owned [`Message`].
    pub fn to_message(self) -> Message {
        Message::new(self.sender, self.command, self.channel, self.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NICK: &str = "gravitybot";

    #[test]
    fn test_parse_prefixed_privmsg() {
        let msg = MessageRef::parse(":alice!alice@alice.tmi.twitch.tv PRIVMSG #rust :hello there", NICK);
        assert_eq!(msg.sender, "alice");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.channel, "#rust");
        assert_eq!(msg.contents, "hello there");
    }

    #[test]
    fn test_parse_ping_without_prefix() {
        let msg = MessageRef::parse("PING :tmi.twitch.tv", NICK);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.contents, "tmi.twitch.tv");
        assert_eq!(msg.sender, "");
        assert_eq!(msg.channel, "");
    }

    #[test]
    fn test_parse_prefixless_head_is_trimmed() {
        let msg = MessageRef::parse("  PING  :server", NICK);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.contents, "server");
    }

    #[test]
    fn test_parse_no_colon_is_empty() {
        let msg = MessageRef::parse("PING", NICK);
        assert!(msg.is_empty());

        let msg = MessageRef::parse("", NICK);
        assert!(msg.is_empty());
    }

    #[test]
    fn test_parse_whitespace_head_takes_prefixed_branch() {
        let msg = MessageRef::parse("   :bob!bob@host JOIN #chan", NICK);
        assert_eq!(msg.sender, "bob");
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.channel, "#chan");
        assert_eq!(msg.contents, "");
    }

    #[test]
    fn test_parse_target_is_own_nick() {
        let msg = MessageRef::parse(":alice!alice@host PRIVMSG gravitybot :psst", NICK);
        assert_eq!(msg.sender, "alice");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.channel, "");
        assert_eq!(msg.contents, "psst");

        // Own nick is compared after trimming.
        let msg = MessageRef::parse(":alice!alice@host PRIVMSG gravitybot :psst", "  gravitybot ");
        assert_eq!(msg.channel, "");
    }

    #[test]
    fn test_parse_sender_without_bang() {
        let msg = MessageRef::parse(":tmi.twitch.tv 001 someone :Welcome, GLHF!", NICK);
        assert_eq!(msg.sender, "");
        assert_eq!(msg.command, "001");
        assert_eq!(msg.channel, "someone");
        assert_eq!(msg.contents, "Welcome, GLHF!");
    }

    #[test]
    fn test_parse_short_prefix_keeps_contents() {
        let msg = MessageRef::parse(":tmi.twitch.tv :twitch.tv/tags", NICK);
        assert_eq!(msg.sender, "");
        assert_eq!(msg.command, "");
        assert_eq!(msg.channel, "");
        assert_eq!(msg.contents, "twitch.tv/tags");
    }

    #[test]
    fn test_parse_join_without_payload() {
        let msg = MessageRef::parse(":gravitybot!gravitybot@host JOIN #gravitybotv2", NICK);
        assert_eq!(msg.sender, "gravitybot");
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.channel, "#gravitybotv2");
        assert_eq!(msg.contents, "");
    }

    #[test]
    fn test_parse_contents_stop_at_next_colon() {
        let msg = MessageRef::parse(":alice!a@h PRIVMSG #c :see: this", NICK);
        assert_eq!(msg.contents, "see");
    }

    #[test]
    fn test_parse_empty_payload() {
        let msg = MessageRef::parse(":alice!a@h PRIVMSG #c :", NICK);
        assert_eq!(msg.channel, "#c");
        assert_eq!(msg.contents, "");
    }
}
