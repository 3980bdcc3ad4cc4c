//! `/* ... */` block comment detection.
//!
//! Two phases. The first counts unmatched openers from the start of the
//! buffer up to the caret, which covers comments opened on earlier lines and
//! nested-looking `/* /* */ */` sequences. When that count is zero, the
//! second phase looks only at the caret's own line.
//!
//! Comment markers inside string literals are not skipped.

use tracing::trace;

use super::line;
use crate::error::ClassifyError;

/// Number of `/*` openers left unmatched by `*/` before `offset`.
///
/// A marker is recognised only when both of its characters lie before the
/// caret, so a caret between `/` and `*` of an opener is not yet inside, and
/// a caret between `*` and `/` of a closer is still inside.
pub(crate) fn depth_before(chars: &[char], offset: usize) -> usize {
    let safe = offset.min(chars.len());
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < safe {
        match (chars[i], chars[i + 1]) {
            ('/', '*') => {
                depth += 1;
                i += 2;
            }
            ('*', '/') => {
                depth = depth.saturating_sub(1);
                i += 2;
            }
            _ => i += 1,
        }
    }
    depth
}

fn find_marker(line: &[char], first: char, second: char) -> Option<usize> {
    line.windows(2).position(|w| w[0] == first && w[1] == second)
}

/// Same-line check used when no earlier opener is still open.
fn inside_on_line(chars: &[char], offset: usize) -> Result<bool, ClassifyError> {
    let safe = offset.min(chars.len());
    let (start, line) = line::line_at(chars, safe)?;
    let line_offset = (safe - start).min(line.len());

    let Some(open) = find_marker(line, '/', '*') else {
        return Ok(false);
    };
    let Some(close) = find_marker(line, '*', '/') else {
        return Ok(true);
    };
    if close <= open {
        return Ok(false);
    }
    Ok(line_offset > open + 2 && line_offset < close)
}

pub(crate) fn scan(chars: &[char], offset: usize) -> Result<bool, ClassifyError> {
    let depth = depth_before(chars, offset);
    trace!(depth, "block comment depth before caret");
    if depth > 0 {
        return Ok(true);
    }
    inside_on_line(chars, offset)
}

/// Return `true` if the character offset lies inside an open block comment.
///
/// Offsets past the end of `text` are clamped.
pub fn is_inside_block_comment(text: &str, offset: usize) -> Result<bool, ClassifyError> {
    let chars: Vec<char> = text.chars().collect();
    scan(&chars, offset)
}
