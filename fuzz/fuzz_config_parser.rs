//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `AppConfig::parse()`, which also compiles any
//! pattern rules it finds, and builds a pattern engine from whatever parses.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = imectx_config::AppConfig::parse(s) {
            let _ = config.build_pattern_engine();
        }
    }
});
