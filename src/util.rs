//! Utility functions shared by the client, logging, and configuration.

/// Maximum accepted length of one inbound protocol line, in bytes.
pub const MAX_LINE_LEN: usize = 8191;

/// Character used in place of every character of a redacted secret.
pub const REDACTION_CHAR: char = '*';

/// Masks a secret character-for-character.
///
/// The result has exactly as many characters as the input and shares none
/// of its text, so log lines keep their shape without leaking the value.
///
/// # Examples
///
/// ```
/// use twitchline::util::redact;
///
/// assert_eq!(redact("oauth:abc"), "*********");
/// assert_eq!(redact(""), "");
/// ```
#[inline]
pub fn redact(secret: &str) -> String {
    secret.chars().map(|_| REDACTION_CHAR).collect()
}
