//! Fuzz target for caret classification.
//!
//! Run with: cargo +nightly fuzz run fuzz_detect_context
//!
//! The first eight bytes pick the caret offset, the ninth the commit-buffer
//! flag, and the rest is the buffer text. Classification must never panic
//! and must never report `Unknown` for a valid buffer.

#![no_main]

use imectx_core::{ContextKind, Switcher, detect_context};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[..8]);
    let offset = i64::from_le_bytes(raw);
    let is_git_commit = data[8] & 1 == 1;
    let text = String::from_utf8_lossy(&data[9..]);

    let info = detect_context(&text, is_git_commit, offset);
    assert_ne!(info.kind, ContextKind::Unknown);
    assert_eq!(info, detect_context(&text, is_git_commit, offset));

    let _ = Switcher::default().decide("Fuzz.java", &text, offset);
});
