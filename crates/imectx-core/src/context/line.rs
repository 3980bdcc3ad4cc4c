//! Current-line extraction.

use crate::error::{ClassifyError, span};

/// Start and end (exclusive) of the line holding `offset`.
///
/// The offset is clamped to the buffer length. A caret sitting on a `\n`
/// belongs to the line that newline terminates.
pub(crate) fn line_bounds(chars: &[char], offset: usize) -> (usize, usize) {
    let safe = offset.min(chars.len());
    let start = chars[..safe]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let end = chars[safe..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| safe + i);
    (start, end)
}

/// The line holding `offset` together with the index its first character
/// has in `chars`.
pub(crate) fn line_at(chars: &[char], offset: usize) -> Result<(usize, &[char]), ClassifyError> {
    let (start, end) = line_bounds(chars, offset);
    Ok((start, span(chars, start, end)?))
}

/// Return the line of `text` containing the character offset `offset`,
/// without its trailing newline.
pub fn current_line(text: &str, offset: usize) -> Result<String, ClassifyError> {
    let chars: Vec<char> = text.chars().collect();
    let (_, line) = line_at(&chars, offset)?;
    Ok(line.iter().collect())
}
