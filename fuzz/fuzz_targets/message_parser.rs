//! Fuzz target for line parsing
//!
//! Feeds arbitrary lines to the parser and checks it never panics and
//! that every recognised field is a slice of the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        // Split off a nickname to compare targets against
        let (own_nick, line) = input.split_once('\n').unwrap_or(("gravitybot", input));

        let msg = twitchline::MessageRef::parse(line, own_nick);
        for field in [msg.sender, msg.command, msg.channel, msg.contents] {
            assert!(line.contains(field));
        }

        let owned = twitchline::Message::parse(line, own_nick);
        assert_eq!(owned.borrowed(), msg);
    }
});
