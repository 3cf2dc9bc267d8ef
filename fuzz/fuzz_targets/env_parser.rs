//! Fuzz target for env file parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Errors are fine, panics are not
        let _ = twitchline::config::parse_env(input);
    }
});
